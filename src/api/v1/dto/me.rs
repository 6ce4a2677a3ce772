use serde::Serialize;

use crate::services::auth::Claims;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub claims: Claims,
}
