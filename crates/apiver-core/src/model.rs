//! Frozen version models and versioned endpoints

use crate::version::ApiVersion;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Versions a single endpoint answers, plus what its group advertises
///
/// Models are only produced by [`ConventionBuilder::build`](crate::ConventionBuilder::build)
/// and are immutable afterwards. Share them behind an [`Arc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionModel {
    pub(crate) name: String,
    pub(crate) declared: BTreeSet<ApiVersion>,
    pub(crate) mapped: BTreeSet<ApiVersion>,
    pub(crate) supported: BTreeSet<ApiVersion>,
    pub(crate) deprecated: BTreeSet<ApiVersion>,
    pub(crate) version_neutral: bool,
}

impl ApiVersionModel {
    pub(crate) fn neutral(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: BTreeSet::new(),
            mapped: BTreeSet::new(),
            supported: BTreeSet::new(),
            deprecated: BTreeSet::new(),
            version_neutral: true,
        }
    }

    /// Logical group name, as produced by the group name convention
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Versions explicitly declared on the group
    pub fn declared_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.declared
    }

    /// Versions this endpoint actually answers
    ///
    /// The group's declared versions unless the member was mapped explicitly
    /// or narrowed by a range.
    pub fn mapped_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.mapped
    }

    /// Every version the group reports as available, deprecated ones included
    pub fn supported_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.supported
    }

    /// Versions the group reports as deprecated; always a subset of
    /// [`supported_versions`](Self::supported_versions)
    pub fn deprecated_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.deprecated
    }

    /// Whether the endpoint ignores versioning altogether
    pub fn is_version_neutral(&self) -> bool {
        self.version_neutral
    }

    /// Whether the endpoint answers `version`
    pub fn is_mapped_to(&self, version: &ApiVersion) -> bool {
        self.version_neutral || self.mapped.contains(version)
    }

    /// Whether `version` is deprecated for this group
    pub fn is_deprecated(&self, version: &ApiVersion) -> bool {
        self.deprecated.contains(version)
    }
}

/// A candidate endpoint carrying its version model
///
/// Built once at startup by the routing host and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedEndpoint {
    id: String,
    route: Option<String>,
    model: Arc<ApiVersionModel>,
}

impl VersionedEndpoint {
    /// Create an endpoint with an identifier such as `Orders.Get`
    pub fn new(id: impl Into<String>, model: Arc<ApiVersionModel>) -> Self {
        Self {
            id: id.into(),
            route: None,
            model,
        }
    }

    /// Attach the route template the endpoint is served under
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Endpoint identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Route template, if known
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Logical group name used for sunset lookups
    pub fn name(&self) -> &str {
        self.model.name()
    }

    /// Version model
    pub fn model(&self) -> &ApiVersionModel {
        &self.model
    }
}
