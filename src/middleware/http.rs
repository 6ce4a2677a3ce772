//! HTTP-level middleware (cross-cutting concerns).
//!
//! - Request-Id generation + propagation (`x-request-id`)
//! - Access logging (TraceLayer)
//! - Body size limit and global timeout
//! - `x-elapsed-millis` on every response

use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, Request, StatusCode, header::HeaderName};
use axum::middleware::{self, Next};
use axum::response::Response;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const ELAPSED_MILLIS_HEADER: &str = "x-elapsed-millis";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Defaults: 64 KiB body limit (requests carry no payload), 10 second timeout.
pub fn apply(router: Router) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .layer(TraceLayer::new_for_http());

    // Outermost, so the measurement covers every other layer.
    router
        .layer(layers)
        .layer(middleware::from_fn(elapsed_millis))
}

async fn elapsed_millis(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(req).await;

    let elapsed = started.elapsed().as_millis();
    if let Ok(v) = HeaderValue::from_str(&elapsed.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(ELAPSED_MILLIS_HEADER), v);
    }
    response
}
