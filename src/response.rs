/*
 * Responsibility
 * - Response builder consuming ApiError lists (status / headers / body)
 * - Status inheritance: explicit status wins, then the first error status
 * - Cache and CORS headers
 */
use axum::{
    body::Body,
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, LOCATION, PRAGMA},
    },
    response::{IntoResponse, Response},
};
use chrono::{TimeDelta, Utc};
use serde_json::Value;
use tracing::warn;

use crate::services::auth::ApiError;

pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF-8";

const NO_CACHE_EXPIRES: &str = "Thu, 19 Nov 1981 08:52:00 GMT";
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Default)]
pub struct ApiResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<Value>,
    errors: Vec<ApiError>,
    cache_seconds: u64,
}

impl ApiResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalid_request() -> Self {
        Self::new()
            .status(StatusCode::BAD_REQUEST)
            .error(ApiError::new("Invalid request").with_status(400))
    }

    /// 401 without a default error; callers attach the validation errors.
    pub fn unauthorized() -> Self {
        Self::new().status(StatusCode::UNAUTHORIZED)
    }

    pub fn not_found() -> Self {
        Self::new()
            .status(StatusCode::NOT_FOUND)
            .error(ApiError::new("Not found").with_status(404))
    }

    pub fn server_error() -> Self {
        Self::new()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .error(ApiError::new("Error processing request").with_status(500))
    }

    pub fn service_unavailable() -> Self {
        Self::new()
            .status(StatusCode::SERVICE_UNAVAILABLE)
            .error(ApiError::new("Service unavailable").with_status(503))
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// A body replaces the rendered error list.
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn error(mut self, error: ApiError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn errors(mut self, errors: impl IntoIterator<Item = ApiError>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// `None` allows any origin.
    pub fn allow_cors(self, origin: Option<&str>) -> Self {
        let value = match origin.map(HeaderValue::from_str) {
            None => HeaderValue::from_static("*"),
            Some(Ok(v)) => v,
            Some(Err(_)) => {
                warn!(origin = ?origin, "invalid CORS origin, allowing any");
                HeaderValue::from_static("*")
            }
        };
        self.header(ACCESS_CONTROL_ALLOW_ORIGIN, value)
    }

    pub fn cache_for_seconds(mut self, seconds: u64) -> Self {
        self.cache_seconds = seconds;
        self
    }

    pub fn cache_for_minutes(self, minutes: u64) -> Self {
        self.cache_for_seconds(minutes.saturating_mul(60))
    }

    pub fn cache_for_hours(self, hours: u64) -> Self {
        self.cache_for_minutes(hours.saturating_mul(60))
    }

    pub fn redirect(self, url: &str, permanent: bool) -> Self {
        let status = if permanent {
            StatusCode::MOVED_PERMANENTLY
        } else {
            StatusCode::FOUND
        };
        let this = self
            .status(status)
            .body(format!("Found. Redirecting to {}", url));

        match HeaderValue::from_str(url) {
            Ok(location) => this.header(LOCATION, location),
            Err(_) => {
                warn!(url, "redirect target is not a valid header value");
                this
            }
        }
    }

    /// Explicit status, else the first error carrying one, else 200.
    pub fn resolved_status(&self) -> StatusCode {
        self.status
            .or_else(|| {
                self.errors
                    .iter()
                    .find_map(ApiError::status)
                    .and_then(|s| StatusCode::from_u16(s).ok())
            })
            .unwrap_or(StatusCode::OK)
    }

    fn rendered_body(&self) -> Value {
        // `{}` / `[]` count as no body, so errors still render.
        let body = self.body.as_ref().filter(|body| match body {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        });

        match body {
            Some(body) => body.clone(),
            None if !self.errors.is_empty() => {
                Value::Array(self.errors.iter().map(error_json).collect())
            }
            None => self.body.clone().unwrap_or_else(|| Value::Object(Default::default())),
        }
    }

    fn apply_cache_headers(&self, headers: &mut HeaderMap) {
        let expires = TimeDelta::try_seconds(i64::try_from(self.cache_seconds).unwrap_or(i64::MAX))
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .map(|at| at.format(HTTP_DATE).to_string())
            .and_then(|s| HeaderValue::from_str(&s).ok());

        match expires {
            Some(expires) if self.cache_seconds > 0 => {
                headers.remove(PRAGMA);
                headers.insert(EXPIRES, expires);
                if let Ok(v) =
                    HeaderValue::from_str(&format!("must-revalidate, max-age={}", self.cache_seconds))
                {
                    headers.insert(CACHE_CONTROL, v);
                }
            }
            _ => {
                headers.insert(EXPIRES, HeaderValue::from_static(NO_CACHE_EXPIRES));
                headers.insert(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, max-age=0, must-revalidate"),
                );
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            }
        }
    }
}

fn error_json(error: &ApiError) -> Value {
    serde_json::to_value(error).unwrap_or(Value::Null)
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.resolved_status();
        let body = match self.rendered_body() {
            // Plain strings (redirect notes) go out as-is.
            Value::String(s) => s.into_bytes(),
            other => serde_json::to_vec(&other).unwrap_or_default(),
        };

        let mut headers = self.headers.clone();
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(CONTENT_TYPE_JSON));
        self.apply_cache_headers(&mut headers);

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::Source;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_response() {
        let response = ApiResponse::new().into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(response.headers()[PRAGMA], "no-cache");
        assert_eq!(response.headers()[EXPIRES], NO_CACHE_EXPIRES);
        assert_eq!(body_json(response).await, json!({}));
    }

    #[tokio::test]
    async fn errors_become_body() {
        let err = ApiError::new("Invalid authorization token")
            .with_detail("Token expired")
            .with_source(Source::header("Authorization"));
        let id = err.id().to_string();

        let response = ApiResponse::unauthorized().error(err).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!([{
                "id": id,
                "title": "Invalid authorization token",
                "detail": "Token expired",
                "sources": [{ "location": "header", "path": "Authorization" }],
            }])
        );
    }

    #[tokio::test]
    async fn explicit_body_wins_over_errors() {
        let response = ApiResponse::new()
            .error(ApiError::new("ignored"))
            .body(json!({ "ok": true }))
            .into_response();

        assert_eq!(body_json(response).await, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn empty_body_does_not_hide_errors() {
        for empty in [json!({}), json!([])] {
            let response = ApiResponse::unauthorized()
                .body(empty)
                .error(ApiError::new("No token supplied"))
                .into_response();

            let body = body_json(response).await;
            assert_eq!(body[0]["title"], "No token supplied");
        }
    }

    #[tokio::test]
    async fn empty_body_kept_without_errors() {
        let response = ApiResponse::new().body(json!([])).into_response();

        assert_eq!(body_json(response).await, json!([]));
    }

    #[test]
    fn status_inherited_from_first_error_with_status() {
        let response = ApiResponse::new()
            .error(ApiError::new("a"))
            .error(ApiError::new("b").with_status(404))
            .error(ApiError::new("c").with_status(500));

        assert_eq!(response.resolved_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.status(StatusCode::CONFLICT).resolved_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn errors_without_status_keep_default() {
        let response = ApiResponse::new().error(ApiError::new("a"));

        assert_eq!(response.resolved_status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn canned_responses() {
        for (response, status, title) in [
            (ApiResponse::invalid_request(), 400, "Invalid request"),
            (ApiResponse::not_found(), 404, "Not found"),
            (ApiResponse::server_error(), 500, "Error processing request"),
            (ApiResponse::service_unavailable(), 503, "Service unavailable"),
        ] {
            let response = response.into_response();
            assert_eq!(response.status().as_u16(), status);
            let body = body_json(response).await;
            assert_eq!(body[0]["title"], title);
            assert_eq!(body[0]["status"], status);
        }
    }

    #[test]
    fn cache_headers() {
        let response = ApiResponse::new().cache_for_minutes(30).into_response();

        assert_eq!(response.headers()[CACHE_CONTROL], "must-revalidate, max-age=1800");
        assert!(response.headers().get(PRAGMA).is_none());
        assert_ne!(response.headers()[EXPIRES], NO_CACHE_EXPIRES);
    }

    #[test]
    fn cors() {
        let any = ApiResponse::new().allow_cors(None).into_response();
        let one = ApiResponse::new()
            .allow_cors(Some("https://app.example.com"))
            .into_response();

        assert_eq!(any.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            one.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn redirect() {
        let response = ApiResponse::new()
            .redirect("https://example.com/next", false)
            .into_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "https://example.com/next");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Found. Redirecting to https://example.com/next");
    }
}
