//! Bearer token validation: extract -> decode -> claim checks.
//!
//! Extraction and decode failures stop the flow with a single error (there is
//! no token to look at). Claim failures accumulate, so one call reports every
//! broken constraint.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, warn};

use super::api_error::{ApiError, FailureReason, IdGenerator, Source, UuidIds};
use super::claims::{ClaimViolation, Claims, check_claims};
use super::decode::{DecodeError, TokenDecoder};
use super::extract::{ExtractError, Scheme, extract_token};
use super::rules::ValidationConfig;

pub const INVALID_TOKEN_TITLE: &str = "Invalid authorization token";

/// Outcome of one validation. Holds a token only when there are no errors.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    errors: Vec<ApiError>,
    token: Option<Claims>,
}

impl ValidationResult {
    fn accepted(token: Claims) -> Self {
        Self {
            errors: Vec::new(),
            token: Some(token),
        }
    }

    fn rejected(errors: Vec<ApiError>) -> Self {
        Self {
            errors,
            token: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ApiError] {
        &self.errors
    }

    pub fn token(&self) -> Option<&Claims> {
        self.token.as_ref()
    }

    pub fn into_errors(self) -> Vec<ApiError> {
        self.errors
    }

    pub fn into_token(self) -> Result<Claims, Vec<ApiError>> {
        match self.token {
            Some(token) if self.errors.is_empty() => Ok(token),
            _ => Err(self.errors),
        }
    }
}

#[derive(Clone)]
pub struct Validator {
    decoder: Arc<dyn TokenDecoder>,
    ids: Arc<dyn IdGenerator>,
    error_status: Option<u16>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl Validator {
    pub fn new(decoder: Arc<dyn TokenDecoder>) -> Self {
        Self {
            decoder,
            ids: Arc::new(UuidIds),
            error_status: None,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Status stamped on every validation error. Unset by default.
    pub fn with_error_status(mut self, status: u16) -> Self {
        self.error_status = Some(status);
        self
    }

    /// Validates `raw` (a header value, or a bare token with `Scheme::Bare`).
    ///
    /// `field` names the header the value came from; when set, every error
    /// gets a `header` source pointing at it.
    pub fn validate(
        &self,
        raw: Option<&str>,
        scheme: Scheme,
        field: Option<&str>,
        rules: &ValidationConfig,
    ) -> ValidationResult {
        let token = match extract_token(raw, scheme) {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "no usable token in request");
                let reason = match e {
                    ExtractError::NoTokenSupplied => FailureReason::NoTokenSupplied,
                    ExtractError::MalformedAuthorizationHeader => {
                        FailureReason::MalformedAuthorizationHeader
                    }
                };
                return ValidationResult::rejected(vec![self.error(
                    e.to_string(),
                    None,
                    reason,
                    field,
                )]);
            }
        };

        let claims = match self.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "token rejected by decoder");
                return ValidationResult::rejected(vec![self.error(
                    INVALID_TOKEN_TITLE,
                    Some(e.to_string()),
                    FailureReason::InvalidToken,
                    field,
                )]);
            }
        };

        let errors: Vec<ApiError> = check_claims(&claims, rules)
            .into_iter()
            .map(|violation| {
                let reason = match violation {
                    ClaimViolation::Issuer => FailureReason::InvalidIssuer,
                    ClaimViolation::Audience => FailureReason::InvalidAudience,
                    ClaimViolation::Revoked => FailureReason::Revoked,
                };
                self.error(
                    INVALID_TOKEN_TITLE,
                    Some(violation.detail().to_string()),
                    reason,
                    field,
                )
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::accepted(claims)
        } else {
            debug!(count = errors.len(), jti = ?claims.jti(), "token claims rejected");
            ValidationResult::rejected(errors)
        }
    }

    // A panicking decoder is reported like any other decode failure.
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        catch_unwind(AssertUnwindSafe(|| self.decoder.decode(token))).unwrap_or_else(|_| {
            warn!("token decoder panicked");
            Err(DecodeError::Fault)
        })
    }

    fn error(
        &self,
        title: impl Into<String>,
        detail: Option<String>,
        reason: FailureReason,
        field: Option<&str>,
    ) -> ApiError {
        let mut err = ApiError::with_ids(self.ids.as_ref(), title).with_reason(reason);
        if let Some(detail) = detail {
            err.set_detail(detail);
        }
        if let Some(status) = self.error_status {
            err.set_status(status);
        }
        if let Some(field) = field {
            err.add_source(Source::header(field));
        }
        err
    }
}
