//! Job filters, canonical query strings and request keys.
//!
//! Everything that ends up on the wire or in a cache key goes through
//! [`QueryParams`], which keeps its pairs sorted by key. Two filters with the
//! same values therefore always produce the same query string and the same
//! [`RequestKey`], no matter in which order the fields were set.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Largest page the API will serve.
pub const MAX_PAGE_LIMIT: usize = 100;

// =============================================================================
// Query parameters
// =============================================================================

/// Sorted query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert a parameter only when a non-empty value is present.
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.0.insert(key.to_string(), value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encoded `k=v&k=v` string in key order. Empty when there are no
    /// parameters.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// Parse a raw query string (without the leading `?`). Later duplicates
    /// win.
    pub fn parse(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =============================================================================
// Job filter
// =============================================================================

/// Filter accepted by the job listing. Every field is optional; unset fields
/// are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JobFilter {
    /// Free-text match on title, company and criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Location substring; the value "Remote" selects remote postings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,

    #[validate(range(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Page size after defaults and clamping.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Canonical query parameters for this filter.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("search", self.search.as_deref().map(str::trim));
        params.insert_opt("location", self.location.as_deref().map(str::trim));
        params.insert_opt("remote", self.remote);
        params.insert_opt("limit", self.limit);
        params.insert_opt("offset", self.offset);
        params
    }

    /// Rebuild a filter from query parameters. Unknown keys and values that
    /// do not parse are ignored.
    pub fn from_params(params: &QueryParams) -> Self {
        let text = |key: &str| {
            params
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            search: text("search"),
            location: text("location"),
            remote: params.get("remote").and_then(|v| v.parse().ok()),
            limit: params.get("limit").and_then(|v| v.parse().ok()),
            offset: params.get("offset").and_then(|v| v.parse().ok()),
        }
    }

    /// Parse query parameters the way the API server does: values that do
    /// not parse and limits outside `1..=100` are errors. Unknown keys are
    /// still ignored.
    pub fn try_from_params(params: &QueryParams) -> Result<Self, String> {
        fn typed<T: std::str::FromStr>(
            params: &QueryParams,
            key: &str,
        ) -> Result<Option<T>, String> {
            params
                .get(key)
                .map(|raw| {
                    raw.trim()
                        .parse()
                        .map_err(|_| format!("Invalid value for {}: {}", key, raw))
                })
                .transpose()
        }

        let filter = Self {
            remote: typed(params, "remote")?,
            limit: typed(params, "limit")?,
            offset: typed(params, "offset")?,
            ..Self::from_params(params)
        };
        filter.validate().map_err(|e| e.to_string())?;
        Ok(filter)
    }

    /// Cache identity for a request of `resource` with this filter.
    pub fn request_key(&self, resource: &str) -> RequestKey {
        RequestKey::new(resource, &self.to_params())
    }
}

// =============================================================================
// Request key
// =============================================================================

/// Stable identity of a parameterized request: the resource name plus its
/// canonical query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    resource: String,
    query: String,
}

impl RequestKey {
    pub fn new(resource: impl Into<String>, params: &QueryParams) -> Self {
        Self {
            resource: resource.into(),
            query: params.to_query_string(),
        }
    }

    /// Key for a parameterless resource such as `jobs/job-0001`.
    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            query: String::new(),
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}?{}", self.resource, self.query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_is_order_independent() {
        let a = JobFilter {
            remote: Some(true),
            search: Some("rust".into()),
            limit: Some(10),
            ..Default::default()
        };
        let b = JobFilter::new()
            .with_limit(10)
            .with_search("rust")
            .with_remote(true);

        assert_eq!(a.to_params().to_query_string(), "limit=10&remote=true&search=rust");
        assert_eq!(a.request_key("jobs"), b.request_key("jobs"));
    }

    #[test]
    fn test_omitted_and_empty_fields_are_excluded() {
        let filter = JobFilter {
            search: Some("   ".into()),
            location: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.to_params().is_empty());
        assert_eq!(filter.request_key("jobs").to_string(), "jobs");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let filter = JobFilter::new().with_location("São Paulo & co");
        assert_eq!(
            filter.to_params().to_query_string(),
            "location=S%C3%A3o+Paulo+%26+co"
        );
    }

    #[test]
    fn test_from_params_recovers_filter() {
        let filter = JobFilter::new()
            .with_search("zk")
            .with_location("Remote")
            .with_remote(true)
            .with_limit(5)
            .with_offset(10);
        let parsed = QueryParams::parse(&filter.to_params().to_query_string());
        assert_eq!(JobFilter::from_params(&parsed), filter);
    }

    #[test]
    fn test_from_params_ignores_garbage() {
        let params = QueryParams::parse("remote=maybe&limit=ten&color=blue");
        assert_eq!(JobFilter::from_params(&params), JobFilter::default());
    }

    #[test]
    fn test_try_from_params_rejects_what_the_api_rejects() {
        let err = JobFilter::try_from_params(&QueryParams::parse("remote=maybe")).unwrap_err();
        assert!(err.contains("remote"));
        assert!(JobFilter::try_from_params(&QueryParams::parse("limit=ten")).is_err());
        assert!(JobFilter::try_from_params(&QueryParams::parse("limit=500")).is_err());
        assert!(JobFilter::try_from_params(&QueryParams::parse("limit=0")).is_err());
        assert!(JobFilter::try_from_params(&QueryParams::parse("offset=-1")).is_err());
    }

    #[test]
    fn test_try_from_params_accepts_valid_filter() {
        let params = QueryParams::parse("remote=true&limit=5&offset=10&search=zk&color=blue");
        let filter = JobFilter::try_from_params(&params).unwrap();
        assert_eq!(
            filter,
            JobFilter::new()
                .with_search("zk")
                .with_remote(true)
                .with_limit(5)
                .with_offset(10)
        );
        assert_eq!(JobFilter::try_from_params(&QueryParams::new()).unwrap(), JobFilter::default());
    }

    #[test]
    fn test_effective_limit_is_clamped() {
        assert_eq!(JobFilter::new().effective_limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(JobFilter::new().with_limit(0).effective_limit(), 1);
        assert_eq!(JobFilter::new().with_limit(500).effective_limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_limit_validation() {
        assert!(JobFilter::new().with_limit(50).validate().is_ok());
        assert!(JobFilter::new().with_limit(0).validate().is_err());
        assert!(JobFilter::new().with_limit(101).validate().is_err());
    }
}
