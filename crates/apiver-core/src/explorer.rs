//! Per-version API descriptions
//!
//! Documentation generators group endpoints by API version. [`ApiExplorer`]
//! flattens the versions declared across all endpoints and lists, for each
//! of them, the endpoints that answer it.

use crate::model::VersionedEndpoint;
use crate::options::VersioningOptions;
use crate::sunset::{SunsetPolicy, SunsetPolicyManager};
use crate::version::{ApiVersion, VersionFormat};
use std::collections::BTreeSet;

/// One endpoint as seen under one API version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDescription {
    /// Group name, formatted with `group_name_format`
    pub group_name: String,
    /// Version the description belongs to
    pub version: ApiVersion,
    /// Endpoint identifier
    pub endpoint_id: String,
    /// Route template with the version token substituted
    pub route: Option<String>,
    /// Whether the version is deprecated for this endpoint
    pub deprecated: bool,
    /// Resolved sunset policy
    pub sunset: Option<SunsetPolicy>,
}

/// Builds [`ApiDescription`]s from candidate endpoints
#[derive(Debug, Clone)]
pub struct ApiExplorer {
    group_name_format: String,
    token: String,
    default_version: ApiVersion,
}

impl ApiExplorer {
    /// Create an explorer using the group name format, template token and
    /// default version of `options`
    pub fn new(options: &VersioningOptions) -> Self {
        Self {
            group_name_format: options.group_name_format.clone(),
            token: options.url_segment_template_token.clone(),
            default_version: options.default_version.clone(),
        }
    }

    /// Versions the descriptions are grouped by
    ///
    /// The union of declared versions, or the default version when no
    /// endpoint declares any.
    pub fn versions(&self, endpoints: &[VersionedEndpoint]) -> BTreeSet<ApiVersion> {
        let mut versions: BTreeSet<ApiVersion> = endpoints
            .iter()
            .flat_map(|endpoint| endpoint.model().declared_versions().iter().cloned())
            .collect();
        if versions.is_empty() {
            versions.insert(self.default_version.clone());
        }
        versions
    }

    /// Describe every endpoint under every version it answers
    ///
    /// Ordered by version, then by endpoint order. Version-neutral endpoints
    /// appear under every version.
    pub fn describe(
        &self,
        endpoints: &[VersionedEndpoint],
        sunset: &SunsetPolicyManager,
    ) -> Vec<ApiDescription> {
        let mut descriptions = Vec::new();
        for version in self.versions(endpoints) {
            let group_name = version.format(VersionFormat::Pattern(&self.group_name_format));
            for endpoint in endpoints {
                let model = endpoint.model();
                if !model.is_mapped_to(&version) {
                    continue;
                }
                let sunset = if model.is_version_neutral() {
                    None
                } else {
                    sunset.resolve_effective(Some(endpoint.name()), Some(&version))
                };
                descriptions.push(ApiDescription {
                    group_name: group_name.clone(),
                    version: version.clone(),
                    endpoint_id: endpoint.id().to_string(),
                    route: endpoint
                        .route()
                        .map(|route| route.replace(&self.token, &version.to_string())),
                    deprecated: model.is_deprecated(&version),
                    sunset,
                });
            }
        }

        tracing::debug!(
            endpoints = endpoints.len(),
            descriptions = descriptions.len(),
            "API descriptions built"
        );
        descriptions
    }
}

impl Default for ApiExplorer {
    fn default() -> Self {
        Self::new(&VersioningOptions::default())
    }
}
