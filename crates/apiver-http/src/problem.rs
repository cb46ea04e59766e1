//! Problem details (`application/problem+json`) for rejected requests

use crate::headers::append_headers;
use apiver_core::{
    Ambiguity, ApiVersion, Classification, Resolution, SunsetPolicyManager, VersionMatcherPolicy,
};
use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Media type of problem details bodies
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Problem details body describing a version rejection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDetails {
    /// Problem type URI
    #[serde(rename = "type")]
    pub type_uri: &'static str,
    /// Short summary
    pub title: &'static str,
    /// HTTP status code
    pub status: u16,
    /// Explanation specific to this request
    pub detail: String,
    /// Stable problem code, e.g. `UnsupportedApiVersion`
    pub code: &'static str,
    /// Requested versions, when the request carried any
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requested_versions: Vec<String>,
    /// Versions the route supports
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported_versions: Vec<String>,
}

impl ProblemDetails {
    /// Problem details for a rejected resolution; `None` when it succeeded
    pub fn from_resolution(resolution: &Resolution<'_>) -> Option<Self> {
        let classification = resolution.classification();
        let code = classification.code()?;
        let (type_uri, title) = match classification {
            Classification::Ok => return None,
            Classification::Unspecified => (
                "https://docs.api-versioning.org/problems#unspecified",
                "Unspecified API version",
            ),
            Classification::Ambiguous(_) => (
                "https://docs.api-versioning.org/problems#ambiguous",
                "Ambiguous API version",
            ),
            Classification::Unsupported { .. } => (
                "https://docs.api-versioning.org/problems#unsupported",
                "Unsupported API version",
            ),
            Classification::Invalid { .. } => (
                "https://docs.api-versioning.org/problems#invalid",
                "Invalid API version",
            ),
        };

        let requested_versions = match classification {
            Classification::Ambiguous(Ambiguity::RequestedVersions(versions)) => strings(versions),
            Classification::Unsupported { requested, .. } => vec![requested.to_string()],
            Classification::Invalid { token } => vec![token.clone()],
            _ => Vec::new(),
        };

        Some(Self {
            type_uri,
            title,
            status: StatusCode::BAD_REQUEST.as_u16(),
            detail: classification.to_string(),
            code,
            requested_versions,
            supported_versions: strings(resolution.report().supported_versions()),
        })
    }

    /// Render as a `400 Bad Request` response
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let body = match serde_json::to_vec(&self) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "problem details could not be serialized");
                Vec::new()
            }
        };
        let mut response = Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = StatusCode::BAD_REQUEST;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

fn strings<'a>(versions: impl IntoIterator<Item = &'a ApiVersion>) -> Vec<String> {
    versions.into_iter().map(ToString::to_string).collect()
}

/// Rejection response for a resolution, including version headers
///
/// `None` when an endpoint was selected.
pub fn rejection_response(
    policy: &VersionMatcherPolicy,
    resolution: &Resolution<'_>,
    sunset: &SunsetPolicyManager,
) -> Option<Response<Full<Bytes>>> {
    let problem = ProblemDetails::from_resolution(resolution)?;
    tracing::debug!(code = problem.code, "rejecting request with problem details");
    let mut response = problem.into_response();
    append_headers(
        response.headers_mut(),
        policy.response_headers(resolution, sunset),
    );
    Some(response)
}
