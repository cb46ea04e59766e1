//! Supported / deprecated version reporting

use crate::model::VersionedEndpoint;
use crate::version::ApiVersion;
use std::collections::BTreeSet;

/// Response header listing supported versions
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";
/// Response header listing deprecated versions
pub const DEPRECATED_VERSIONS_HEADER: &str = "api-deprecated-versions";

/// Versions available on a logical route, across all of its candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionReport {
    supported: BTreeSet<ApiVersion>,
    deprecated: BTreeSet<ApiVersion>,
    current: BTreeSet<ApiVersion>,
}

impl VersionReport {
    /// Union of the supported and deprecated versions of every candidate
    ///
    /// A version some candidate supports without deprecating it is reported
    /// as supported, even if another candidate deprecates it.
    /// Version-neutral candidates contribute nothing.
    pub fn from_endpoints<'a, I>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = &'a VersionedEndpoint>,
    {
        let mut report = Self::default();
        for endpoint in endpoints {
            let model = endpoint.model();
            report.supported.extend(model.supported_versions().iter().cloned());
            report.deprecated.extend(model.deprecated_versions().iter().cloned());
            report.current.extend(
                model
                    .supported_versions()
                    .difference(model.deprecated_versions())
                    .cloned(),
            );
        }
        let current = &report.current;
        report.deprecated.retain(|version| !current.contains(version));
        report
    }

    /// All supported versions, deprecated ones included
    pub fn supported_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.supported
    }

    /// Deprecated versions
    pub fn deprecated_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.deprecated
    }

    /// Whether `version` is deprecated on this route
    pub fn is_deprecated(&self, version: &ApiVersion) -> bool {
        self.deprecated.contains(version)
    }

    /// `api-supported-versions` value: supported versions that are not deprecated
    pub fn supported_header_value(&self) -> Option<String> {
        join(self.current.iter())
    }

    /// `api-deprecated-versions` value
    pub fn deprecated_header_value(&self) -> Option<String> {
        join(self.deprecated.iter())
    }

    /// Reporting headers; empty lists are omitted
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if let Some(value) = self.supported_header_value() {
            headers.push((SUPPORTED_VERSIONS_HEADER, value));
        }
        if let Some(value) = self.deprecated_header_value() {
            headers.push((DEPRECATED_VERSIONS_HEADER, value));
        }
        headers
    }
}

fn join<'a>(versions: impl Iterator<Item = &'a ApiVersion>) -> Option<String> {
    let values: Vec<String> = versions.map(ToString::to_string).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}
