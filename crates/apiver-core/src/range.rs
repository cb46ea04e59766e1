//! Version ranges used to narrow which versions a member answers

use crate::version::ApiVersion;

/// Inclusive bounds on the versions a member answers
///
/// An empty range (`min > max`) contains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRange {
    /// Lowest version answered
    pub min: Option<ApiVersion>,
    /// Highest version answered
    pub max: Option<ApiVersion>,
    /// Versions skipped inside the bounds
    pub excluded: Vec<ApiVersion>,
}

impl VersionRange {
    /// Unbounded range
    pub fn any() -> Self {
        Self::default()
    }

    /// Range starting at a version, e.g. a member introduced in 2.0
    pub fn from(version: ApiVersion) -> Self {
        Self {
            min: Some(version),
            ..Self::default()
        }
    }

    /// Range ending at a version, e.g. a member removed after 1.0
    pub fn until(version: ApiVersion) -> Self {
        Self {
            max: Some(version),
            ..Self::default()
        }
    }

    /// Range from `min` to `max`, both included
    pub fn between(min: ApiVersion, max: ApiVersion) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            excluded: Vec::new(),
        }
    }

    /// Skip one version
    pub fn exclude(mut self, version: ApiVersion) -> Self {
        self.excluded.push(version);
        self
    }

    /// Whether `version` lies within the bounds and is not excluded
    pub fn contains(&self, version: &ApiVersion) -> bool {
        self.min.as_ref().map_or(true, |min| version >= min)
            && self.max.as_ref().map_or(true, |max| version <= max)
            && !self.excluded.contains(version)
    }
}
