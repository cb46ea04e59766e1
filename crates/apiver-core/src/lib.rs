//! API version resolution for HTTP services
//!
//! This crate decides, per request, which API version applies and which of
//! several version-differentiated endpoints handles it. It is transport
//! agnostic: requests are seen through [`VersionRequest`], and the
//! `apiver-http` crate adapts `http` types.
//!
//! # Features
//!
//! - `{major}.{minor}[-{status}]` versions with a total order
//! - Query string, header, media type, URL segment and custom readers
//! - Convention-based version declarations frozen into an immutable table
//! - Sunset policies with `(name, version)` precedence
//! - Endpoint matching with `Ambiguous`, `Unsupported`, `Unspecified` and
//!   `Invalid` classifications
//! - `config`: load [`VersioningOptions`] from environment variables
//!
//! # Usage
//!
//! ```
//! use apiver_core::{
//!     ApiVersion, ConventionBuilder, RawRequest, VersionMatcherPolicy, VersioningOptions,
//! };
//!
//! let mut conventions = ConventionBuilder::new();
//! conventions.group("OrdersController").declare_version(ApiVersion::new(1, 0));
//! conventions.group("Orders2Controller").declare_version(ApiVersion::new(2, 0));
//! let table = conventions.build().unwrap();
//!
//! let candidates = [
//!     table.endpoint("OrdersController", "Get").unwrap(),
//!     table.endpoint("Orders2Controller", "Get").unwrap(),
//! ];
//!
//! let policy = VersionMatcherPolicy::new(VersioningOptions::default());
//! let request = RawRequest::new("/orders").query("api-version", "2.0");
//! let resolution = policy.resolve(&request, &candidates);
//!
//! assert_eq!(resolution.selected().unwrap().id(), "Orders2Controller.Get");
//! ```

pub mod convention;
pub mod error;
pub mod explorer;
pub mod matcher;
pub mod model;
pub mod naming;
pub mod options;
pub mod range;
pub mod reader;
pub mod report;
pub mod request;
pub mod sunset;
pub mod version;

#[cfg(feature = "config")]
pub mod config;

#[cfg(test)]
mod tests;

pub use convention::{
    ConventionBuilder, ConventionCell, GroupConvention, MemberConvention, UnreachableMember,
    VersionTable,
};
pub use error::{Result, VersioningError};
pub use explorer::{ApiDescription, ApiExplorer};
pub use matcher::{Ambiguity, Classification, Resolution, VersionMatcherPolicy};
pub use model::{ApiVersionModel, VersionedEndpoint};
pub use naming::GroupNameConvention;
pub use options::{UnspecifiedHandling, VersionSelector, VersioningOptions};
pub use range::VersionRange;
pub use reader::{ReadApiVersion, VersionReader};
pub use report::VersionReport;
pub use request::{RawRequest, VersionRequest};
pub use sunset::{SunsetLink, SunsetPolicy, SunsetPolicyManager};
pub use version::{ApiVersion, VersionFormat};

#[cfg(feature = "config")]
pub use config::ConfigError;
