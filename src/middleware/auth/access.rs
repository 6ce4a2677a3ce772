//! Bearer token validation -> AuthCtx in request extensions.
//!
//! - `Authorization: Bearer <jwt>` is validated with the shared `Validator`
//!   and the process-wide claim rules.
//! - On failure every validation error is returned in one 401 body.
//! - On success the claims are handed to handlers through `AuthCtx`.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::response::ApiResponse;
use crate::services::auth::validate_authorization_header;
use crate::state::AppState;

/// Require a valid bearer token on every route of `router`.
///
/// ```ignore
/// let v1 = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn can't take the State extractor, so pass it with from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let validation = validate_authorization_header(req.headers(), &state.validator, &state.rules);

    let claims = match validation.into_token() {
        Ok(claims) => claims,
        Err(errors) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                reasons = ?errors.iter().map(|e| e.reason()).collect::<Vec<_>>(),
                "access token rejected"
            );

            let mut response = ApiResponse::unauthorized().errors(errors);
            if let Some(origin) = state.cors_allow_origin.as_deref() {
                response = response.allow_cors(Some(origin));
            }
            return response.into_response();
        }
    };

    req.extensions_mut().insert(AuthCtx::new(claims));

    next.run(req).await
}
