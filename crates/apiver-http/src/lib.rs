//! `http` adapter for apiver-core
//!
//! Connects the version resolution engine to the `http` crate types used by
//! hyper-based servers:
//!
//! - [`HttpVersionRequest`] exposes an `http::Request` to version readers
//! - [`version_headers`] renders supported, deprecated and sunset headers
//! - [`rejection_response`] turns a rejected resolution into a
//!   `400 Bad Request` problem details response
//!
//! # Usage
//!
//! ```
//! use apiver_core::{ApiVersion, ConventionBuilder, SunsetPolicyManager, VersionMatcherPolicy};
//! use apiver_http::{rejection_response, resolve};
//!
//! let mut conventions = ConventionBuilder::new();
//! conventions.group("Orders").declare_version(ApiVersion::new(1, 0));
//! let table = conventions.build().unwrap();
//! let candidates = [table.endpoint("Orders", "Get").unwrap()];
//!
//! let policy = VersionMatcherPolicy::default();
//! let request = http::Request::builder()
//!     .uri("/orders?api-version=2.0")
//!     .body(())
//!     .unwrap();
//!
//! let resolution = resolve(&policy, &request, &candidates);
//! let response = rejection_response(&policy, &resolution, &SunsetPolicyManager::new());
//! assert_eq!(response.unwrap().status(), http::StatusCode::BAD_REQUEST);
//! ```

pub mod headers;
pub mod problem;
pub mod request;

pub use headers::{append_headers, version_headers};
pub use problem::{rejection_response, ProblemDetails, PROBLEM_JSON};
pub use request::HttpVersionRequest;

use apiver_core::{Resolution, VersionMatcherPolicy, VersionedEndpoint};
use http::Request;

/// Resolve an `http::Request` against the candidates of one route
pub fn resolve<'e, B>(
    policy: &VersionMatcherPolicy,
    request: &Request<B>,
    candidates: &'e [VersionedEndpoint],
) -> Resolution<'e> {
    policy.resolve(&HttpVersionRequest::new(request), candidates)
}
