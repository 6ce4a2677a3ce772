//! Bearer token validation with structured, accumulated validation errors.
//!
//! The engine lives in [`services::auth`]; [`response`] renders its errors and
//! the rest wires both into an axum service.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod services;
pub mod state;
