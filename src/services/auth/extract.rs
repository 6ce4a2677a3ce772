//! Header value -> bare token string.

pub const BEARER_PREFIX: &str = "Bearer ";

/// How the raw value carries the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `Bearer <token>`
    Bearer,
    /// The whole value is the token.
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("No token supplied")]
    NoTokenSupplied,
    #[error("Authorization header not in correct format")]
    MalformedAuthorizationHeader,
}

pub fn extract_token(raw: Option<&str>, scheme: Scheme) -> Result<&str, ExtractError> {
    let raw = match raw {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ExtractError::NoTokenSupplied),
    };

    let token = match scheme {
        Scheme::Bearer => raw
            .strip_prefix(BEARER_PREFIX)
            .ok_or(ExtractError::MalformedAuthorizationHeader)?,
        Scheme::Bare => raw,
    };

    if token.is_empty() {
        return Err(ExtractError::NoTokenSupplied);
    }

    Ok(token)
}
