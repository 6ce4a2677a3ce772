//! Shared helpers for integration tests: RSA fixtures and token minting.
//!
//! The keys under `tests/fixtures/` are test-only and public; never reuse them.

#![allow(dead_code)]

use std::sync::Arc;

use bearer_guard::services::auth::{JwtDecoder, SequentialIds, Validator};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Map, Value, json};

pub const PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/signing-key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/signing-key.pub.pem");
pub const OTHER_PUBLIC_KEY: &str = include_str!("../fixtures/other-key.pub.pem");

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOpts {
    pub before_nbf: bool,
    pub after_exp: bool,
}

/// RS256 token with `jti`, `nbf` and `exp` defaults, overridden by `fields`.
pub fn make_token(opts: TokenOpts, fields: Value) -> (String, Value) {
    let now = now();
    let mut claims = Map::new();
    claims.insert("jti".into(), json!(format!("ID-{}", uuid::Uuid::new_v4())));
    claims.insert(
        "nbf".into(),
        json!(if opts.before_nbf { now + 120 } else { now - 120 }),
    );
    claims.insert(
        "exp".into(),
        json!(if opts.after_exp { now - 120 } else { now + 120 }),
    );
    if let Value::Object(extra) = fields {
        claims.extend(extra);
    }
    let claims = Value::Object(claims);

    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY).expect("fixture private key");
    let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .expect("failed to sign token");

    (token, claims)
}

/// Reverses the signature segment so the token no longer verifies.
pub fn reverse_signature(token: &str) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    let sig: String = parts[2].chars().rev().collect();
    format!("{}.{}.{}", parts[0], parts[1], sig)
}

pub fn validator_for(public_key: &str) -> Validator {
    let decoder = JwtDecoder::from_pem(public_key.as_bytes(), Algorithm::RS256, 0)
        .expect("fixture public key");
    Validator::new(Arc::new(decoder)).with_id_generator(Arc::new(SequentialIds::new("err")))
}

pub fn validator() -> Validator {
    validator_for(PUBLIC_KEY)
}
