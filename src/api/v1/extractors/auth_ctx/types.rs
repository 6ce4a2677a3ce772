/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The middleware validates and stores it in request extensions; handlers
 *   only ever receive this type
 */
use crate::services::auth::Claims;

/// Context attached to an authenticated request.
///
/// - `claims` is the full validated token (custom claims included)
/// - `subject` / `jti` are copied out for logging and correlation
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub claims: Claims,
    pub subject: Option<String>,
    pub jti: Option<String>,
}

impl AuthCtx {
    pub fn new(claims: Claims) -> Self {
        Self {
            subject: claims.sub().map(str::to_string),
            jti: claims.jti().map(str::to_string),
            claims,
        }
    }
}
