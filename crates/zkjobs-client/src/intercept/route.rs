//! Route matching for the mock network.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use zkjobs_models::{ApiEnvelope, QueryParams};

/// A request as seen by a mock handler.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    /// Values captured by `:name` segments of the route pattern
    pub params: HashMap<String, String>,
}

impl MockRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A canned response.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl MockResponse {
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "error": format!("mock serialization failed: {}", e) })
        });
        Self { status, body }
    }

    /// 200 with a success envelope around `data`.
    pub fn ok<T: Serialize>(data: T) -> Self {
        Self::json(200, &ApiEnvelope::ok(data))
    }

    /// Error status with a failure envelope.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &ApiEnvelope::<()>::failure(message))
    }
}

/// Handler invoked for a matched route.
pub type MockHandler = Arc<dyn Fn(&MockRequest) -> MockResponse + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Path pattern such as `/jobs/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Captured parameters when `path` matches, percent-decoded.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    params.insert(name.clone(), value);
                }
            }
        }
        Some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A registered handler.
#[derive(Clone)]
pub(crate) struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: MockHandler,
}
