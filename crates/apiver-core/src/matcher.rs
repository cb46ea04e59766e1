//! Endpoint selection by API version
//!
//! [`VersionMatcherPolicy`] turns a request and the candidate endpoints of a
//! logical route into a [`Resolution`]: the effective version, the winning
//! endpoint and a [`Classification`] that is either `Ok` or the reason the
//! request must be rejected.
//!
//! Resolution runs in this order:
//!
//! 1. Read raw tokens with the configured [`VersionReader`]
//! 2. Parse every token; one bad token makes the request `Invalid`
//! 3. Reconcile: several distinct versions are `Ambiguous`, none goes through
//!    the default version policy
//! 4. Keep the versioned candidates mapped to the effective version
//! 5. Fall back to a version-neutral candidate when step 2 to 4 rejected the
//!    request
//!
//! The supported/deprecated report is computed on every path.

use crate::model::VersionedEndpoint;
use crate::options::{UnspecifiedHandling, VersionSelector, VersioningOptions};
use crate::reader::VersionReader;
use crate::report::VersionReport;
use crate::request::VersionRequest;
use crate::sunset::{SunsetPolicy, SunsetPolicyManager};
use crate::version::ApiVersion;
use std::collections::BTreeSet;
use std::fmt;

/// Problem code for unparsable versions
pub const INVALID_API_VERSION: &str = "InvalidApiVersion";
/// Problem code for conflicting versions or endpoints
pub const AMBIGUOUS_API_VERSION: &str = "AmbiguousApiVersion";
/// Problem code for versions no candidate implements
pub const UNSUPPORTED_API_VERSION: &str = "UnsupportedApiVersion";
/// Problem code for missing versions
pub const API_VERSION_UNSPECIFIED: &str = "ApiVersionUnspecified";

/// What was ambiguous about a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// The request carried several distinct versions
    RequestedVersions(Vec<ApiVersion>),
    /// Several endpoints answer the same version
    Endpoints {
        /// Effective version, if any
        version: Option<ApiVersion>,
        /// Identifiers of the conflicting endpoints
        endpoints: Vec<String>,
    },
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// An endpoint was selected
    Ok,
    /// No version was requested and none could be assumed
    Unspecified,
    /// Too many versions or endpoints
    Ambiguous(Ambiguity),
    /// No candidate implements the requested version
    Unsupported {
        /// Effective version
        requested: ApiVersion,
        /// Versions the route supports
        supported: Vec<ApiVersion>,
    },
    /// A raw token is not a version
    Invalid {
        /// The offending token
        token: String,
    },
}

impl Classification {
    /// Whether an endpoint was selected
    pub fn is_ok(&self) -> bool {
        matches!(self, Classification::Ok)
    }

    /// Problem code for a rejection
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Classification::Ok => None,
            Classification::Unspecified => Some(API_VERSION_UNSPECIFIED),
            Classification::Ambiguous(_) => Some(AMBIGUOUS_API_VERSION),
            Classification::Unsupported { .. } => Some(UNSUPPORTED_API_VERSION),
            Classification::Invalid { .. } => Some(INVALID_API_VERSION),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Ok => write!(f, "ok"),
            Classification::Unspecified => {
                write!(f, "An API version is required, but was not specified")
            }
            Classification::Ambiguous(Ambiguity::RequestedVersions(versions)) => write!(
                f,
                "The request specifies multiple API versions: {}",
                join(versions)
            ),
            Classification::Ambiguous(Ambiguity::Endpoints { version, endpoints }) => {
                match version {
                    Some(version) => {
                        write!(f, "Multiple endpoints match API version '{}'", version)?
                    }
                    None => write!(f, "Multiple endpoints match the request")?,
                }
                write!(f, ": {}", endpoints.join(", "))
            }
            Classification::Unsupported {
                requested,
                supported,
            } => write!(
                f,
                "API version '{}' is not supported; supported versions: {}",
                requested,
                join(supported)
            ),
            Classification::Invalid { token } => {
                write!(f, "'{}' is not a valid API version", token)
            }
        }
    }
}

fn join(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-request resolution result
///
/// Borrows the selected endpoint from the candidate slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'e> {
    raw_tokens: Vec<String>,
    requested: BTreeSet<ApiVersion>,
    effective: Option<ApiVersion>,
    selected: Option<&'e VersionedEndpoint>,
    classification: Classification,
    report: VersionReport,
}

impl<'e> Resolution<'e> {
    /// Raw tokens as read from the request
    pub fn raw_tokens(&self) -> &[String] {
        &self.raw_tokens
    }

    /// Distinct versions parsed from the raw tokens
    pub fn requested_versions(&self) -> &BTreeSet<ApiVersion> {
        &self.requested
    }

    /// Version the request was matched against
    pub fn effective_version(&self) -> Option<&ApiVersion> {
        self.effective.as_ref()
    }

    /// Winning endpoint
    pub fn selected(&self) -> Option<&'e VersionedEndpoint> {
        self.selected
    }

    /// Outcome
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Supported and deprecated versions of the route
    pub fn report(&self) -> &VersionReport {
        &self.report
    }

    /// Whether an endpoint was selected
    pub fn is_ok(&self) -> bool {
        self.classification.is_ok()
    }

    /// Whether the selected endpoint serves a deprecated version
    pub fn is_deprecated(&self) -> bool {
        match (self.selected, &self.effective) {
            (Some(endpoint), Some(version)) => endpoint.model().is_deprecated(version),
            _ => false,
        }
    }

    /// Sunset policy of the selected endpoint's version
    ///
    /// Version-neutral endpoints have none.
    pub fn sunset_policy(&self, manager: &SunsetPolicyManager) -> Option<SunsetPolicy> {
        let endpoint = self.selected?;
        if endpoint.model().is_version_neutral() {
            return None;
        }
        manager.resolve_effective(Some(endpoint.name()), self.effective.as_ref())
    }
}

struct Selection<'e> {
    effective: Option<ApiVersion>,
    selected: Option<&'e VersionedEndpoint>,
    classification: Classification,
}

impl<'e> Selection<'e> {
    fn rejected(effective: Option<ApiVersion>, classification: Classification) -> Self {
        Self {
            effective,
            selected: None,
            classification,
        }
    }
}

/// Selects endpoints by API version
///
/// Stateless per request; share one instance across threads.
#[derive(Debug, Clone, Default)]
pub struct VersionMatcherPolicy {
    options: VersioningOptions,
    reader: VersionReader,
}

impl VersionMatcherPolicy {
    /// Create a policy reading versions as `options` describe
    pub fn new(options: VersioningOptions) -> Self {
        Self {
            reader: options.reader(),
            options,
        }
    }

    /// Replace the reader built from the options
    pub fn with_reader(mut self, reader: VersionReader) -> Self {
        self.reader = reader;
        self
    }

    /// Options in use
    pub fn options(&self) -> &VersioningOptions {
        &self.options
    }

    /// Reader in use
    pub fn reader(&self) -> &VersionReader {
        &self.reader
    }

    /// Resolve a request against the candidates of one logical route
    pub fn resolve<'e>(
        &self,
        request: &dyn VersionRequest,
        candidates: &'e [VersionedEndpoint],
    ) -> Resolution<'e> {
        self.resolve_tokens(self.reader.read(request), candidates)
    }

    /// Resolve already extracted raw tokens
    pub fn resolve_tokens<'e>(
        &self,
        raw_tokens: Vec<String>,
        candidates: &'e [VersionedEndpoint],
    ) -> Resolution<'e> {
        let report = VersionReport::from_endpoints(candidates);
        let (neutral, versioned): (Vec<_>, Vec<_>) = candidates
            .iter()
            .partition(|endpoint| endpoint.model().is_version_neutral());

        let mut requested = BTreeSet::new();
        let mut invalid = None;
        for token in &raw_tokens {
            match ApiVersion::parse(token) {
                Ok(version) => {
                    requested.insert(version);
                }
                Err(_) => {
                    invalid = Some(token.clone());
                    break;
                }
            }
        }

        let mut selection = if let Some(token) = invalid {
            Selection::rejected(None, Classification::Invalid { token })
        } else if requested.len() > 1 {
            Selection::rejected(
                None,
                Classification::Ambiguous(Ambiguity::RequestedVersions(
                    requested.iter().cloned().collect(),
                )),
            )
        } else if let Some(version) = requested.first() {
            select(version.clone(), &versioned, &report)
        } else {
            self.unspecified(&versioned, &report)
        };

        if rejected_by_request(&selection.classification) {
            match neutral.as_slice() {
                [] => {}
                [endpoint] => {
                    selection.selected = Some(*endpoint);
                    selection.classification = Classification::Ok;
                }
                many => {
                    selection.classification = Classification::Ambiguous(Ambiguity::Endpoints {
                        version: selection.effective.clone(),
                        endpoints: ids(many),
                    });
                }
            }
        }

        if !selection.classification.is_ok() {
            tracing::debug!(
                tokens = ?raw_tokens,
                code = selection.classification.code().unwrap_or_default(),
                reason = %selection.classification,
                "API version request rejected"
            );
        }

        Resolution {
            raw_tokens,
            requested,
            effective: selection.effective,
            selected: selection.selected,
            classification: selection.classification,
            report,
        }
    }

    /// Reporting and sunset headers for a resolution
    ///
    /// Empty unless `report_api_versions` is enabled.
    pub fn response_headers(
        &self,
        resolution: &Resolution<'_>,
        sunset: &SunsetPolicyManager,
    ) -> Vec<(&'static str, String)> {
        if !self.options.report_api_versions {
            return Vec::new();
        }
        let mut headers = resolution.report().headers();
        if let Some(policy) = resolution.sunset_policy(sunset) {
            headers.extend(policy.headers());
        }
        headers
    }

    fn unspecified<'e>(
        &self,
        versioned: &[&'e VersionedEndpoint],
        report: &VersionReport,
    ) -> Selection<'e> {
        if self.options.assume_default_version_when_unspecified {
            let version = match self.options.version_selector {
                VersionSelector::Default => self.options.default_version.clone(),
                VersionSelector::Latest => {
                    latest(versioned).unwrap_or_else(|| self.options.default_version.clone())
                }
            };
            return select(version, versioned, report);
        }

        match (self.options.unspecified_handling, versioned) {
            (UnspecifiedHandling::Unconstrained, [endpoint]) => Selection {
                effective: None,
                selected: Some(*endpoint),
                classification: Classification::Ok,
            },
            _ => Selection::rejected(None, Classification::Unspecified),
        }
    }
}

fn select<'e>(
    version: ApiVersion,
    versioned: &[&'e VersionedEndpoint],
    report: &VersionReport,
) -> Selection<'e> {
    let matches: Vec<&'e VersionedEndpoint> = versioned
        .iter()
        .copied()
        .filter(|endpoint| endpoint.model().is_mapped_to(&version))
        .collect();

    match matches.as_slice() {
        [] => Selection::rejected(
            Some(version.clone()),
            Classification::Unsupported {
                requested: version,
                supported: report.supported_versions().iter().cloned().collect(),
            },
        ),
        [endpoint] => Selection {
            effective: Some(version),
            selected: Some(*endpoint),
            classification: Classification::Ok,
        },
        many => Selection::rejected(
            Some(version.clone()),
            Classification::Ambiguous(Ambiguity::Endpoints {
                version: Some(version),
                endpoints: ids(many),
            }),
        ),
    }
}

/// Highest non-deprecated version any versioned candidate is mapped to
fn latest(versioned: &[&VersionedEndpoint]) -> Option<ApiVersion> {
    versioned
        .iter()
        .flat_map(|endpoint| {
            let model = endpoint.model();
            model
                .mapped_versions()
                .iter()
                .filter(move |version| !model.is_deprecated(version))
        })
        .max()
        .cloned()
}

/// Rejections caused by the request rather than by conflicting endpoints
fn rejected_by_request(classification: &Classification) -> bool {
    !matches!(
        classification,
        Classification::Ok | Classification::Ambiguous(Ambiguity::Endpoints { .. })
    )
}

fn ids(endpoints: &[&VersionedEndpoint]) -> Vec<String> {
    endpoints.iter().map(|e| e.id().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{ConventionBuilder, VersionTable};
    use crate::request::RawRequest;

    fn v(major: u32, minor: u32) -> ApiVersion {
        ApiVersion::new(major, minor)
    }

    fn orders_table() -> VersionTable {
        let mut builder = ConventionBuilder::new();
        builder
            .group("Orders")
            .declare_version(v(1, 0))
            .declare_version(v(2, 0));
        builder
            .group("Orders3")
            .declare_version(v(3, 0))
            .declare_deprecated_version(v(2, 5));
        builder.group("Health").version_neutral();
        builder.build().unwrap()
    }

    fn policy() -> VersionMatcherPolicy {
        VersionMatcherPolicy::new(VersioningOptions::new().headers(["x-api-version"]))
    }

    #[test]
    fn test_single_version_selects_endpoint() {
        let table = orders_table();
        let candidates = [
            table.endpoint("Orders", "Get").unwrap(),
            table.endpoint("Orders3", "Get").unwrap(),
        ];

        let request = RawRequest::new("/orders").query("api-version", "3.0");
        let resolution = policy().resolve(&request, &candidates);

        assert!(resolution.is_ok());
        assert_eq!(resolution.selected().map(VersionedEndpoint::id), Some("Orders3.Get"));
        assert_eq!(resolution.effective_version(), Some(&v(3, 0)));
    }

    #[test]
    fn test_disagreeing_readers_are_ambiguous() {
        let table = orders_table();
        let candidates = [table.endpoint("Orders", "Get").unwrap()];

        let request = RawRequest::new("/orders")
            .query("api-version", "1.0")
            .header("x-api-version", "2.0");
        let resolution = policy().resolve(&request, &candidates);

        assert_eq!(
            resolution.classification(),
            &Classification::Ambiguous(Ambiguity::RequestedVersions(vec![v(1, 0), v(2, 0)]))
        );
        assert_eq!(resolution.classification().code(), Some(AMBIGUOUS_API_VERSION));
    }

    #[test]
    fn test_equivalent_tokens_are_not_ambiguous() {
        let table = orders_table();
        let candidates = [table.endpoint("Orders", "Get").unwrap()];

        let resolution =
            policy().resolve_tokens(vec!["1.0".to_string(), " 1.0".to_string()], &candidates);
        assert!(resolution.is_ok());
    }

    #[test]
    fn test_unsupported_version_carries_supported_set() {
        let table = orders_table();
        let candidates = [table.endpoint("Orders", "Get").unwrap()];

        let resolution = policy().resolve_tokens(vec!["4.0".to_string()], &candidates);

        assert_eq!(
            resolution.classification(),
            &Classification::Unsupported {
                requested: v(4, 0),
                supported: vec![v(1, 0), v(2, 0)],
            }
        );
        assert!(resolution.selected().is_none());
    }

    #[test]
    fn test_invalid_token_is_terminal() {
        let table = orders_table();
        let candidates = [table.endpoint("Orders", "Get").unwrap()];

        let resolution =
            policy().resolve_tokens(vec!["1.0".to_string(), "one".to_string()], &candidates);

        assert_eq!(
            resolution.classification(),
            &Classification::Invalid {
                token: "one".to_string()
            }
        );
        assert_eq!(resolution.report().supported_versions().len(), 2);
    }

    #[test]
    fn test_unspecified_is_rejected_by_default() {
        let table = orders_table();
        let candidates = [table.endpoint("Orders", "Get").unwrap()];

        let resolution = policy().resolve_tokens(Vec::new(), &candidates);
        assert_eq!(resolution.classification(), &Classification::Unspecified);
        assert_eq!(resolution.classification().code(), Some(API_VERSION_UNSPECIFIED));
    }

    #[test]
    fn test_assumed_default_version() {
        let table = orders_table();
        let candidates = [
            table.endpoint("Orders", "Get").unwrap(),
            table.endpoint("Orders3", "Get").unwrap(),
        ];
        let policy =
            VersionMatcherPolicy::new(VersioningOptions::new().assume_default_version(v(1, 0)));

        let resolution = policy.resolve(&RawRequest::new("/orders"), &candidates);

        assert!(resolution.is_ok());
        assert_eq!(resolution.effective_version(), Some(&v(1, 0)));
        assert!(resolution.requested_versions().is_empty());
    }

    #[test]
    fn test_latest_selector_skips_deprecated_versions() {
        let mut builder = ConventionBuilder::new();
        builder
            .group("Orders")
            .declare_version(v(1, 0))
            .declare_deprecated_version(v(2, 0));
        let table = builder.build().unwrap();
        let candidates = [table.endpoint("Orders", "Get").unwrap()];

        let policy = VersionMatcherPolicy::new(
            VersioningOptions::new()
                .assume_default_version(v(0, 9))
                .selector(VersionSelector::Latest),
        );
        let resolution = policy.resolve_tokens(Vec::new(), &candidates);

        assert_eq!(resolution.effective_version(), Some(&v(1, 0)));
        assert!(!resolution.is_deprecated());
    }

    #[test]
    fn test_unconstrained_selects_only_candidate() {
        let table = orders_table();
        let single = [table.endpoint("Orders", "Get").unwrap()];
        let several = [
            table.endpoint("Orders", "Get").unwrap(),
            table.endpoint("Orders3", "Get").unwrap(),
        ];
        let policy = VersionMatcherPolicy::new(
            VersioningOptions::new().unspecified(UnspecifiedHandling::Unconstrained),
        );

        let resolution = policy.resolve_tokens(Vec::new(), &single);
        assert!(resolution.is_ok());
        assert_eq!(resolution.effective_version(), None);

        let resolution = policy.resolve_tokens(Vec::new(), &several);
        assert_eq!(resolution.classification(), &Classification::Unspecified);
    }

    #[test]
    fn test_overlapping_endpoints_are_ambiguous() {
        let table = orders_table();
        let candidates = [
            table.endpoint("Orders", "Get").unwrap(),
            table.endpoint("Orders", "List").unwrap(),
        ];

        let resolution = policy().resolve_tokens(vec!["2.0".to_string()], &candidates);

        assert_eq!(
            resolution.classification(),
            &Classification::Ambiguous(Ambiguity::Endpoints {
                version: Some(v(2, 0)),
                endpoints: vec!["Orders.Get".to_string(), "Orders.List".to_string()],
            })
        );
        assert!(resolution.classification().to_string().contains("Orders.List"));
    }

    #[test]
    fn test_versioned_match_beats_neutral() {
        let table = orders_table();
        let candidates = [
            table.endpoint("Health", "Get").unwrap(),
            table.endpoint("Orders", "Get").unwrap(),
        ];

        let resolution = policy().resolve_tokens(vec!["1.0".to_string()], &candidates);
        assert_eq!(resolution.selected().map(VersionedEndpoint::id), Some("Orders.Get"));
    }

    #[test]
    fn test_neutral_endpoint_catches_rejections() {
        let table = orders_table();
        let candidates = [
            table.endpoint("Health", "Get").unwrap(),
            table.endpoint("Orders", "Get").unwrap(),
        ];

        for tokens in [vec![], vec!["9.0"], vec!["bad"], vec!["1.0", "2.0"]] {
            let tokens = tokens.into_iter().map(String::from).collect();
            let resolution = policy().resolve_tokens(tokens, &candidates);
            assert_eq!(resolution.selected().map(VersionedEndpoint::id), Some("Health.Get"));
            assert!(resolution.sunset_policy(&SunsetPolicyManager::new()).is_none());
        }
    }

    #[test]
    fn test_response_headers_follow_option() {
        use crate::sunset::SunsetLink;

        let table = orders_table();
        let candidates = [table.endpoint("Orders3", "Get").unwrap()];
        let mut sunset = SunsetPolicyManager::new();
        sunset
            .add_policy(
                Some("Orders"),
                Some(v(2, 5)),
                SunsetPolicy::new().with_link(SunsetLink::new("https://example.com/v2.5")),
            )
            .unwrap();

        let silent = policy();
        let resolution = silent.resolve_tokens(vec!["2.5".to_string()], &candidates);
        assert!(resolution.is_deprecated());
        assert!(silent.response_headers(&resolution, &sunset).is_empty());

        let reporting =
            VersionMatcherPolicy::new(VersioningOptions::new().report_api_versions(true));
        let headers = reporting.response_headers(&resolution, &sunset);
        assert_eq!(
            headers,
            vec![
                ("api-supported-versions", "3.0".to_string()),
                ("api-deprecated-versions", "2.5".to_string()),
                ("link", "<https://example.com/v2.5>; rel=\"sunset\"".to_string()),
            ]
        );
    }
}
