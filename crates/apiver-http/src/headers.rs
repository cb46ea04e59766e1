//! Writing version metadata into response headers

use apiver_core::{Resolution, SunsetPolicyManager, VersionMatcherPolicy};
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;

/// Append `(name, value)` pairs to a header map
///
/// Pairs with a value that is not a valid header value are skipped.
pub fn append_headers<N>(headers: &mut HeaderMap, pairs: impl IntoIterator<Item = (N, String)>)
where
    N: AsRef<str>,
{
    for (name, value) in pairs {
        let name = name.as_ref();
        let Ok(header) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(name = %name, "invalid header name skipped");
            continue;
        };
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.append(header, value);
            }
            Err(_) => tracing::warn!(name = %name, value = %value, "invalid header value skipped"),
        }
    }
}

/// Reporting and sunset headers for a resolution
///
/// Empty unless the policy reports API versions.
pub fn version_headers(
    policy: &VersionMatcherPolicy,
    resolution: &Resolution<'_>,
    sunset: &SunsetPolicyManager,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    append_headers(&mut headers, policy.response_headers(resolution, sunset));
    headers
}
