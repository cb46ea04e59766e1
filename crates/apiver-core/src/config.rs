//! Loading [`VersioningOptions`] from the environment.
//!
//! Field names map to SCREAMING_SNAKE_CASE variables behind a prefix, and
//! lists are comma separated:
//!
//! ```text
//! API_VERSIONING_HEADER_NAMES=x-api-version,api-version
//! API_VERSIONING_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED=true
//! API_VERSIONING_DEFAULT_VERSION=2.0
//! API_VERSIONING_VERSION_SELECTOR=latest
//! ```
//!
//! Unset variables keep their defaults.

use crate::options::VersioningOptions;
use thiserror::Error;

/// Prefix used by [`VersioningOptions::from_env`]
pub const DEFAULT_ENV_PREFIX: &str = "API_VERSIONING";

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Envy(#[from] envy::Error),
}

impl VersioningOptions {
    /// Load options from `API_VERSIONING_*` variables.
    ///
    /// Reads `.env` first; existing variables take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be deserialized, such as a
    /// malformed default version.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_prefixed(DEFAULT_ENV_PREFIX)
    }

    /// Load options from `{prefix}_*` variables.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        load_dotenv();
        let options = envy::prefixed(format!("{}_", prefix)).from_env::<VersioningOptions>()?;
        tracing::debug!(prefix = %prefix, "API versioning options loaded from environment");
        Ok(options)
    }
}

/// Load environment variables from a `.env` file, if there is one.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::VersionSelector;
    use crate::version::ApiVersion;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "APIVER_TEST_HEADER_NAMES",
        "APIVER_TEST_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED",
        "APIVER_TEST_DEFAULT_VERSION",
        "APIVER_TEST_VERSION_SELECTOR",
    ];

    fn clear() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_prefixed() {
        clear();
        std::env::set_var("APIVER_TEST_HEADER_NAMES", "x-api-version,api-version");
        std::env::set_var("APIVER_TEST_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED", "true");
        std::env::set_var("APIVER_TEST_DEFAULT_VERSION", "2.0");
        std::env::set_var("APIVER_TEST_VERSION_SELECTOR", "latest");

        let options = VersioningOptions::from_env_prefixed("APIVER_TEST").unwrap();
        clear();

        assert_eq!(options.header_names, vec!["x-api-version", "api-version"]);
        assert!(options.assume_default_version_when_unspecified);
        assert_eq!(options.default_version, ApiVersion::new(2, 0));
        assert_eq!(options.version_selector, VersionSelector::Latest);
        assert_eq!(options.query_parameter_names, vec!["api-version"]);
    }

    #[test]
    #[serial]
    fn test_unset_variables_keep_defaults() {
        clear();
        let options = VersioningOptions::from_env_prefixed("APIVER_TEST").unwrap();
        assert_eq!(options, VersioningOptions::default());
    }

    #[test]
    #[serial]
    fn test_malformed_version_is_an_error() {
        clear();
        std::env::set_var("APIVER_TEST_DEFAULT_VERSION", "two");

        let result = VersioningOptions::from_env_prefixed("APIVER_TEST");
        clear();

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
