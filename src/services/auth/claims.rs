//! Decoded token claims and the issuer / audience / revocation checks.
//!
//! The checks are independent of each other: every one runs once the token
//! decoded, and `check_claims` reports violations in a fixed order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::rules::ValidationConfig;

/// Claims of a decoded token. Unknown claims are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    fn str_claim(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn iss(&self) -> Option<&str> {
        self.str_claim("iss")
    }

    pub fn sub(&self) -> Option<&str> {
        self.str_claim("sub")
    }

    pub fn jti(&self) -> Option<&str> {
        self.str_claim("jti")
    }

    pub fn aud(&self) -> Option<&Value> {
        self.0.get("aud")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A failed claim constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimViolation {
    Issuer,
    Audience,
    Revoked,
}

impl ClaimViolation {
    pub fn detail(self) -> &'static str {
        match self {
            Self::Issuer => r#"Invalid "iss" value in the token."#,
            Self::Audience => r#"Invalid "aud" value in the token."#,
            Self::Revoked => "Token has been revoked",
        }
    }
}

pub fn check_issuer(claims: &Claims, expected: Option<&str>) -> Result<(), ClaimViolation> {
    match expected {
        Some(expected) if claims.iss() != Some(expected) => Err(ClaimViolation::Issuer),
        _ => Ok(()),
    }
}

/// List `aud` must contain `expected`; scalar `aud` must equal it.
pub fn check_audience(claims: &Claims, expected: Option<&str>) -> Result<(), ClaimViolation> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let ok = match claims.aud() {
        Some(Value::Array(values)) => values.iter().any(|v| v.as_str() == Some(expected)),
        Some(Value::String(aud)) => aud == expected,
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(ClaimViolation::Audience)
    }
}

pub fn check_revocation(claims: &Claims, rules: &ValidationConfig) -> Result<(), ClaimViolation> {
    match claims.jti() {
        Some(jti) if rules.is_revoked(jti) => Err(ClaimViolation::Revoked),
        _ => Ok(()),
    }
}

/// Runs every check; violations come back ordered issuer, audience, revocation.
pub fn check_claims(claims: &Claims, rules: &ValidationConfig) -> Vec<ClaimViolation> {
    [
        check_issuer(claims, rules.issuer()),
        check_audience(claims, rules.audience()),
        check_revocation(claims, rules),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn issuer() {
        let c = claims(json!({ "iss": "MyIssuer" }));

        assert_eq!(check_issuer(&c, None), Ok(()));
        assert_eq!(check_issuer(&c, Some("MyIssuer")), Ok(()));
        assert_eq!(check_issuer(&c, Some("Other")), Err(ClaimViolation::Issuer));
        assert_eq!(
            check_issuer(&claims(json!({})), Some("MyIssuer")),
            Err(ClaimViolation::Issuer)
        );
    }

    #[test]
    fn scalar_audience() {
        let c = claims(json!({ "aud": "MyAPI" }));

        assert_eq!(check_audience(&c, None), Ok(()));
        assert_eq!(check_audience(&c, Some("MyAPI")), Ok(()));
        assert_eq!(check_audience(&c, Some("MyAP")), Err(ClaimViolation::Audience));
    }

    #[test]
    fn list_audience() {
        let c = claims(json!({ "aud": ["MyAPI1", "MyAPI2"] }));

        assert_eq!(check_audience(&c, Some("MyAPI2")), Ok(()));
        assert_eq!(
            check_audience(&c, Some("SomeExpectedAPI")),
            Err(ClaimViolation::Audience)
        );
    }

    #[test]
    fn missing_or_odd_audience_fails() {
        assert_eq!(
            check_audience(&claims(json!({})), Some("MyAPI")),
            Err(ClaimViolation::Audience)
        );
        assert_eq!(
            check_audience(&claims(json!({ "aud": 7 })), Some("7")),
            Err(ClaimViolation::Audience)
        );
    }

    #[test]
    fn revocation() {
        let c = claims(json!({ "jti": "id-123" }));

        assert_eq!(check_revocation(&c, &ValidationConfig::new()), Ok(()));
        assert_eq!(
            check_revocation(
                &c,
                &ValidationConfig::new().with_revoked_token_ids(["id-456", "id-789"])
            ),
            Ok(())
        );
        assert_eq!(
            check_revocation(&c, &ValidationConfig::new().with_revoked_token_ids(["id-123"])),
            Err(ClaimViolation::Revoked)
        );
        // no jti, nothing to revoke
        assert_eq!(
            check_revocation(
                &claims(json!({})),
                &ValidationConfig::new().with_revoked_token_ids(["id-123"])
            ),
            Ok(())
        );
    }

    #[test]
    fn all_violations_in_fixed_order() {
        let c = claims(json!({ "aud": "MyAPI", "iss": "MyIssuer", "jti": "id-123" }));
        let rules = ValidationConfig::new()
            .with_revoked_token_ids(["id-123"])
            .with_audience("MyOtherAPI")
            .with_issuer("SomeIssuer");

        assert_eq!(
            check_claims(&c, &rules),
            vec![
                ClaimViolation::Issuer,
                ClaimViolation::Audience,
                ClaimViolation::Revoked
            ]
        );
    }

    #[test]
    fn accessors_and_passthrough() {
        let c = claims(json!({ "sub": "u1", "jti": "j", "custom": { "a": 1 } }));

        assert_eq!(c.sub(), Some("u1"));
        assert_eq!(c.jti(), Some("j"));
        assert_eq!(c.get("custom"), Some(&json!({ "a": 1 })));
        assert_eq!(c.as_map().len(), 3);
    }
}
