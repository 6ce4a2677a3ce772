/// Factory: build the `Validator` and its rule set from application `Config`.
use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{JwtDecoder, ValidationConfig, Validator};

pub fn build_validator(config: &Config) -> Result<(Arc<Validator>, Arc<ValidationConfig>), AppError> {
    let decoder = JwtDecoder::from_pem(
        config.access_jwt_public_key_pem.as_bytes(),
        config.access_jwt_algorithm,
        config.access_token_leeway_seconds,
    )
    .map_err(|e| {
        warn!(error = %e, algorithm = ?config.access_jwt_algorithm, "invalid access JWT public key");
        AppError::InvalidKey(e.to_string())
    })?;

    let validator = Validator::new(Arc::new(decoder));

    Ok((Arc::new(validator), Arc::new(config.validation_config())))
}
