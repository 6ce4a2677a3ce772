/*
 * Responsibility
 * - GET /me: echo the validated token back to the caller
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    tracing::debug!(subject = ?ctx.subject, jti = ?ctx.jti, "token owner requested");

    Json(MeResponse {
        subject: ctx.subject,
        jti: ctx.jti,
        claims: ctx.claims,
    })
}
