//! Signature + temporal verification of a raw JWT.
//!
//! Only `exp` / `nbf` are enforced here. `iss` / `aud` / revocation are
//! claim constraints and live in `claims`.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::fmt;

use super::claims::Claims;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Signature verification failed")]
    InvalidSignature,
    #[error("Algorithm not allowed")]
    AlgorithmMismatch,
    #[error("Token expired")]
    Expired,
    #[error("Token not yet active")]
    NotYetValid,
    #[error("Token decoding failed: {0}")]
    Other(String),
    #[error("Token decoder fault")]
    Fault,
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidToken => Self::Malformed("not a JWT".to_string()),
            ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                Self::Malformed(e.to_string())
            }
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm => Self::AlgorithmMismatch,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            _ => Self::Other(e.to_string()),
        }
    }
}

/// The decode primitive: raw token in, verified claims out.
pub trait TokenDecoder: Send + Sync {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError>;
}

/// `jsonwebtoken`-backed decoder for one key and one algorithm.
///
/// Key material is not printable via Debug.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(decoding_key: DecodingKey, algorithm: Algorithm, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(algorithm);
        // exp / nbf are checked when present, never required.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Builds the key for `algorithm`'s family: RSA / EC / Ed25519 PEM, or an
    /// HMAC secret taken as raw bytes.
    pub fn from_pem(
        key: &[u8],
        algorithm: Algorithm,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(key)?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key)?,
            Algorithm::EdDSA => DecodingKey::from_ed_pem(key)?,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => DecodingKey::from_secret(key),
        };

        Ok(Self::new(decoding_key, algorithm, leeway_seconds))
    }
}

impl TokenDecoder for JwtDecoder {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
