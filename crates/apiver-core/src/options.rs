//! Versioning options consumed from the host

use crate::naming::GroupNameConvention;
use crate::reader::{VersionReader, DEFAULT_QUERY_PARAMETER, DEFAULT_TEMPLATE_TOKEN};
use crate::version::ApiVersion;
use serde::{Deserialize, Serialize};

/// Version picked when a request specifies none and defaults are assumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSelector {
    /// Use the configured default version
    #[default]
    Default,
    /// Use the highest non-deprecated version the candidates implement
    Latest,
}

/// What to do when no version is requested and no default is assumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnspecifiedHandling {
    /// Report `Unspecified`
    #[default]
    Reject,
    /// Select the only candidate, without any version constraint.
    /// Several candidates still report `Unspecified`.
    Unconstrained,
}

/// API versioning configuration
///
/// Deserializable from any serde source; with the `config` feature it can
/// also be read from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningOptions {
    /// Query string keys carrying a version
    pub query_parameter_names: Vec<String>,
    /// Header names carrying a version
    pub header_names: Vec<String>,
    /// Media type parameter carrying a version
    pub media_type_parameter_name: Option<String>,
    /// Route templates containing the version token
    pub url_segment_templates: Vec<String>,
    /// Version placeholder in route templates
    pub url_segment_template_token: String,
    /// Apply a default version when the request has none
    pub assume_default_version_when_unspecified: bool,
    /// Version used by [`VersionSelector::Default`]
    pub default_version: ApiVersion,
    /// How the default version is chosen
    pub version_selector: VersionSelector,
    /// What happens when no version is requested and none is assumed
    pub unspecified_handling: UnspecifiedHandling,
    /// Add supported/deprecated/sunset headers to responses
    pub report_api_versions: bool,
    /// Pattern for API explorer group names
    pub group_name_format: String,
    /// Convention deriving logical names, applied by
    /// [`ConventionBuilder::with_options`](crate::ConventionBuilder::with_options)
    pub group_name_convention: GroupNameConvention,
}

impl Default for VersioningOptions {
    fn default() -> Self {
        Self {
            query_parameter_names: vec![DEFAULT_QUERY_PARAMETER.to_string()],
            header_names: Vec::new(),
            media_type_parameter_name: None,
            url_segment_templates: Vec::new(),
            url_segment_template_token: DEFAULT_TEMPLATE_TOKEN.to_string(),
            assume_default_version_when_unspecified: false,
            default_version: ApiVersion::default(),
            version_selector: VersionSelector::default(),
            unspecified_handling: UnspecifiedHandling::default(),
            report_api_versions: false,
            group_name_format: "v{major}.{minor}{status}".to_string(),
            group_name_convention: GroupNameConvention::default(),
        }
    }
}

impl VersioningOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted query parameter names
    pub fn query_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_parameter_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the accepted header names
    pub fn headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Read versions from a media type parameter
    pub fn media_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.media_type_parameter_name = Some(name.into());
        self
    }

    /// Read versions from a route template segment
    pub fn url_segment_template(mut self, template: impl Into<String>) -> Self {
        self.url_segment_templates.push(template.into());
        self
    }

    /// Assume `version` when a request does not specify one
    pub fn assume_default_version(mut self, version: ApiVersion) -> Self {
        self.assume_default_version_when_unspecified = true;
        self.default_version = version;
        self
    }

    /// Set the default version selector
    pub fn selector(mut self, selector: VersionSelector) -> Self {
        self.version_selector = selector;
        self
    }

    /// Set the handling of requests without a version
    pub fn unspecified(mut self, handling: UnspecifiedHandling) -> Self {
        self.unspecified_handling = handling;
        self
    }

    /// Enable or disable reporting headers
    pub fn report_api_versions(mut self, enabled: bool) -> Self {
        self.report_api_versions = enabled;
        self
    }

    /// Build the composite reader described by these options
    ///
    /// Readers run in a fixed order: query string, headers, media type,
    /// URL segment. Unconfigured surfaces are skipped.
    pub fn reader(&self) -> VersionReader {
        let mut readers = Vec::new();
        if !self.query_parameter_names.is_empty() {
            readers.push(VersionReader::query_with_names(
                self.query_parameter_names.iter().cloned(),
            ));
        }
        if !self.header_names.is_empty() {
            readers.push(VersionReader::header_with_names(
                self.header_names.iter().cloned(),
            ));
        }
        if let Some(parameter) = &self.media_type_parameter_name {
            readers.push(VersionReader::media_type_with_parameter(parameter.clone()));
        }
        if !self.url_segment_templates.is_empty() {
            readers.push(VersionReader::url_segment_with_token(
                self.url_segment_templates.iter().cloned(),
                self.url_segment_template_token.clone(),
            ));
        }
        VersionReader::combine(readers)
    }
}
