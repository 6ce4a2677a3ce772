//! Reading the `Authorization` header off a request.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::http::HeaderMap;

use super::extract::Scheme;
use super::rules::ValidationConfig;
use super::validator::{ValidationResult, Validator};

pub const AUTHORIZATION: &str = "Authorization";

/// Case-insensitive header lookup.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        // A present value is never dropped: non-UTF-8 bytes are replaced and
        // the token is left for the decoder to reject.
        self.get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
    }
}

/// Validates the `Authorization: Bearer <jwt>` header of `request`.
pub fn validate_authorization_header(
    request: &impl HeaderSource,
    validator: &Validator,
    rules: &ValidationConfig,
) -> ValidationResult {
    let value = request.header(AUTHORIZATION);
    validator.validate(
        value.as_deref(),
        Scheme::Bearer,
        Some(AUTHORIZATION),
        rules,
    )
}
