/*
 * Responsibility
 * - Extractors shared by v1 handlers
 */
mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
