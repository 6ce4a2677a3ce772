/*
 * Responsibility
 * - Structured validation error (id / title / detail / status / sources)
 * - Serialized shape used as the response body element
 * - Id generation is injected so callers (and tests) control it
 */
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use uuid::Uuid;

/// Produces the opaque `id` of every `ApiError`.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 ids (default).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids: `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Url,
    Header,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub location: Location,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "schemaPath", skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
}

impl Source {
    pub fn new(location: Location, path: impl Into<String>) -> Self {
        Self {
            location,
            path: path.into(),
            detail: None,
            schema_path: None,
        }
    }

    pub fn header(path: impl Into<String>) -> Self {
        Self::new(Location::Header, path)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_schema_path(mut self, schema_path: impl Into<String>) -> Self {
        self.schema_path = Some(schema_path.into());
        self
    }
}

/// Why the validator rejected a request.
///
/// Not serialized: callers branch on it, clients only see title/detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoTokenSupplied,
    MalformedAuthorizationHeader,
    InvalidToken,
    InvalidIssuer,
    InvalidAudience,
    Revoked,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<Source>,
    #[serde(skip)]
    reason: Option<FailureReason>,
}

impl ApiError {
    /// New error with a random UUID id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_ids(&UuidIds, title)
    }

    pub fn with_ids(ids: &dyn IdGenerator, title: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(),
            title: title.into(),
            detail: None,
            status: None,
            sources: Vec::new(),
            reason: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub(crate) fn with_reason(mut self, reason: FailureReason) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_detail(&mut self, detail: impl Into<String>) -> &mut Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn set_status(&mut self, status: u16) -> &mut Self {
        self.status = Some(status);
        self
    }

    pub fn add_source(&mut self, source: Source) -> &mut Self {
        self.sources.push(source);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn reason(&self) -> Option<FailureReason> {
        self.reason
    }

    /// Same error apart from the id.
    pub fn same_content(&self, other: &ApiError) -> bool {
        self.title == other.title
            && self.detail == other.detail
            && self.status == other.status
            && self.sources == other.sources
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.title, detail),
            None => f.write_str(&self.title),
        }
    }
}
