/*
 * Responsibility
 * - Caller-supplied claim constraints (issuer / audience / revoked jti)
 * - Immutable once built: builder methods consume and return a new value,
 *   so a rule set can be shared across concurrent requests behind Arc
 */
use std::collections::HashSet;

use serde::Deserialize;

/// Claim constraints for one validation. Unset or empty means "skip this check".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    audience: Option<String>,
    #[serde(default, rename = "revokedTokenIDs")]
    revoked_token_ids: HashSet<String>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_revoked_token_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.revoked_token_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref().filter(|s| !s.is_empty())
    }

    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref().filter(|s| !s.is_empty())
    }

    pub fn revoked_token_ids(&self) -> &HashSet<String> {
        &self.revoked_token_ids
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked_token_ids.contains(jti)
    }
}
