/*
 * Responsibility
 * - Public interface of the middleware (auth::access::apply, http::apply)
 */
pub mod auth;
pub mod http;
