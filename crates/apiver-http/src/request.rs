//! Version request view over `http` types

use apiver_core::VersionRequest;
use http::request::Parts;
use http::{HeaderMap, Request, Uri};

/// Borrowed view of an `http` request for version readers
///
/// The query string is decoded once, when the view is created.
#[derive(Debug, Clone)]
pub struct HttpVersionRequest<'a> {
    path: &'a str,
    query: Vec<(String, String)>,
    headers: &'a HeaderMap,
}

impl<'a> HttpVersionRequest<'a> {
    /// View a full request
    pub fn new<B>(request: &'a Request<B>) -> Self {
        Self::from_uri(request.uri(), request.headers())
    }

    /// View request parts, e.g. inside middleware before the body is read
    pub fn from_parts(parts: &'a Parts) -> Self {
        Self::from_uri(&parts.uri, &parts.headers)
    }

    /// View a URI and a header map
    pub fn from_uri(uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        Self {
            path: uri.path(),
            query: uri.query().map(decode_query).unwrap_or_default(),
            headers,
        }
    }
}

fn decode_query(query: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(query).unwrap_or_else(|error| {
        tracing::debug!(%error, "query string could not be decoded");
        Vec::new()
    })
}

impl VersionRequest for HttpVersionRequest<'_> {
    fn path(&self) -> &str {
        self.path
    }

    fn query_values(&self, name: &str) -> Vec<String> {
        self.query
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}
