//! Read-only view of an incoming request
//!
//! The engine never touches a transport type directly. Hosts implement
//! [`VersionRequest`] for their request type (the `apiver-http` crate does so
//! for `http::Request`), or build a [`RawRequest`].

/// The request surfaces version readers look at
pub trait VersionRequest {
    /// Request path, without the query string
    fn path(&self) -> &str;

    /// All values of a query parameter, matched ignoring ASCII case
    fn query_values(&self, name: &str) -> Vec<String>;

    /// All values of a header, matched ignoring ASCII case
    fn header_values(&self, name: &str) -> Vec<String>;
}

/// Owned request description
///
/// # Example
///
/// ```
/// use apiver_core::{RawRequest, VersionRequest};
///
/// let request = RawRequest::new("/api/orders")
///     .query("api-version", "1.0")
///     .header("Accept", "application/json");
///
/// assert_eq!(request.query_values("API-VERSION"), vec!["1.0"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl RawRequest {
    /// Create a request for a path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter; repeat the call for multi-valued parameters
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add a header value; repeat the call for multi-valued headers
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

fn values_of(pairs: &[(String, String)], name: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.clone())
        .collect()
}

impl VersionRequest for RawRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn query_values(&self, name: &str) -> Vec<String> {
        values_of(&self.query, name)
    }

    fn header_values(&self, name: &str) -> Vec<String> {
        values_of(&self.headers, name)
    }
}
