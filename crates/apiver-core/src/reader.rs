//! Version readers
//!
//! Readers pull raw version tokens out of a request. They never parse or
//! reject anything: a malformed token is returned as-is so the matcher can
//! tell an invalid version apart from an ambiguous one.

use crate::request::VersionRequest;
use std::fmt;
use std::sync::Arc;

/// Default query parameter name
pub const DEFAULT_QUERY_PARAMETER: &str = "api-version";
/// Default header name
pub const DEFAULT_HEADER: &str = "X-API-Version";
/// Default media type parameter name
pub const DEFAULT_MEDIA_TYPE_PARAMETER: &str = "v";
/// Default placeholder for the version in route templates
pub const DEFAULT_TEMPLATE_TOKEN: &str = "{version}";

/// Custom version reading strategy
///
/// Implement this for request surfaces the built-in readers do not cover.
pub trait ReadApiVersion: Send + Sync + fmt::Debug {
    /// Return every raw version token found in the request
    fn read(&self, request: &dyn VersionRequest) -> Vec<String>;
}

/// Strategy for extracting raw API version tokens from requests
#[derive(Debug, Clone)]
pub enum VersionReader {
    /// Read from query parameters (e.g. `?api-version=1.0`)
    QueryString {
        /// Accepted parameter names
        names: Vec<String>,
    },

    /// Read from headers (e.g. `X-API-Version: 1.0`)
    Header {
        /// Accepted header names
        names: Vec<String>,
    },

    /// Read a media type parameter from `Content-Type` and `Accept`
    ///
    /// Example: `Accept: application/json; v=2.0`
    MediaType {
        /// Parameter name inside the media type
        parameter: String,
    },

    /// Read a URL path segment matched against route templates
    ///
    /// Example: template `api/v{version}/orders` reads `1.0` from
    /// `/api/v1.0/orders`.
    UrlSegment {
        /// Route templates containing the token
        templates: Vec<String>,
        /// Placeholder standing for the version
        token: String,
    },

    /// Run every reader and union their results
    Composite(Vec<VersionReader>),

    /// User supplied strategy
    Custom(Arc<dyn ReadApiVersion>),
}

impl VersionReader {
    /// Query string reader using `api-version`
    pub fn query() -> Self {
        Self::query_with_names([DEFAULT_QUERY_PARAMETER])
    }

    /// Query string reader with custom parameter names
    pub fn query_with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::QueryString {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Header reader using `X-API-Version`
    pub fn header() -> Self {
        Self::header_with_names([DEFAULT_HEADER])
    }

    /// Header reader with custom header names
    pub fn header_with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Header {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Media type reader using the `v` parameter
    pub fn media_type() -> Self {
        Self::media_type_with_parameter(DEFAULT_MEDIA_TYPE_PARAMETER)
    }

    /// Media type reader with a custom parameter name
    pub fn media_type_with_parameter(parameter: impl Into<String>) -> Self {
        Self::MediaType {
            parameter: parameter.into(),
        }
    }

    /// URL segment reader for a template using `{version}`
    pub fn url_segment(template: impl Into<String>) -> Self {
        Self::UrlSegment {
            templates: vec![template.into()],
            token: DEFAULT_TEMPLATE_TOKEN.to_string(),
        }
    }

    /// URL segment reader with several templates and a custom token
    pub fn url_segment_with_token<I, S>(templates: I, token: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UrlSegment {
            templates: templates.into_iter().map(Into::into).collect(),
            token: token.into(),
        }
    }

    /// Combine several readers
    pub fn combine(readers: impl IntoIterator<Item = VersionReader>) -> Self {
        Self::Composite(readers.into_iter().collect())
    }

    /// Wrap a custom strategy
    pub fn custom(reader: impl ReadApiVersion + 'static) -> Self {
        Self::Custom(Arc::new(reader))
    }

    /// Read raw version tokens from a request
    ///
    /// Identical tokens collapse to one; different tokens are all kept, in
    /// the order they were found.
    pub fn read(&self, request: &dyn VersionRequest) -> Vec<String> {
        let mut tokens = Vec::new();
        self.read_into(request, &mut tokens);
        tokens
    }

    fn read_into(&self, request: &dyn VersionRequest, tokens: &mut Vec<String>) {
        match self {
            Self::QueryString { names } => {
                for name in names {
                    for value in request.query_values(name) {
                        push_unique(tokens, &value);
                    }
                }
            }
            Self::Header { names } => {
                for name in names {
                    for value in request.header_values(name) {
                        for item in value.split(',') {
                            push_unique(tokens, item);
                        }
                    }
                }
            }
            Self::MediaType { parameter } => {
                for value in request.header_values("content-type") {
                    if let Some(version) = media_type_parameter(&value, parameter) {
                        push_unique(tokens, version);
                    }
                }
                for version in accept_parameters(request, parameter) {
                    push_unique(tokens, &version);
                }
            }
            Self::UrlSegment { templates, token } => {
                let path = request.path();
                for template in templates {
                    if let Some(version) = match_template(path, template, token) {
                        push_unique(tokens, version);
                    }
                }
            }
            Self::Composite(readers) => {
                for reader in readers {
                    reader.read_into(request, tokens);
                }
            }
            Self::Custom(reader) => {
                for value in reader.read(request) {
                    push_unique(tokens, &value);
                }
            }
        }
    }
}

impl Default for VersionReader {
    fn default() -> Self {
        Self::query()
    }
}

impl ReadApiVersion for VersionReader {
    fn read(&self, request: &dyn VersionRequest) -> Vec<String> {
        VersionReader::read(self, request)
    }
}

fn push_unique(tokens: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !tokens.iter().any(|t| t == value) {
        tokens.push(value.to_string());
    }
}

/// Find `parameter` among the `;`-separated parameters of one media type
fn media_type_parameter<'a>(media_type: &'a str, parameter: &str) -> Option<&'a str> {
    media_type.split(';').skip(1).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name.trim().eq_ignore_ascii_case(parameter) {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

fn quality(media_type: &str) -> f32 {
    media_type_parameter(media_type, "q")
        .and_then(|q| q.parse().ok())
        .unwrap_or(1.0)
}

/// Versions from the highest-quality `Accept` entries carrying the parameter
fn accept_parameters(request: &dyn VersionRequest, parameter: &str) -> Vec<String> {
    let mut best: Option<f32> = None;
    let mut versions = Vec::new();

    for value in request.header_values("accept") {
        for media_type in value.split(',') {
            let Some(version) = media_type_parameter(media_type, parameter) else {
                continue;
            };
            let q = quality(media_type);
            match best {
                Some(current) if q < current => continue,
                Some(current) if q == current => {}
                _ => {
                    best = Some(q);
                    versions.clear();
                }
            }
            versions.push(version.to_string());
        }
    }

    versions
}

/// Capture the version segment of `path` according to `template`
///
/// The whole template must match: literal segments compare ignoring ASCII
/// case, route parameters such as `{id}` match any segment, and the path has
/// exactly as many segments as the template.
fn match_template<'a>(path: &'a str, template: &str, token: &str) -> Option<&'a str> {
    let mut segments = path.trim_matches('/').split('/');
    let mut version = None;

    for pattern in template.trim_matches('/').split('/') {
        let segment = segments.next()?;

        if version.is_none() {
            if let Some(at) = pattern.find(token) {
                version = Some(capture(segment, &pattern[..at], &pattern[at + token.len()..])?);
                continue;
            }
        }

        let is_parameter = pattern.starts_with('{') && pattern.ends_with('}');
        if !is_parameter && !segment.eq_ignore_ascii_case(pattern) {
            return None;
        }
    }

    if segments.next().is_some() {
        return None;
    }
    version
}

/// The part of `segment` between `prefix` and `suffix`, if non-empty
fn capture<'a>(segment: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    if segment.len() <= prefix.len() + suffix.len() {
        return None;
    }
    let head = segment.get(..prefix.len())?;
    let tail = segment.get(segment.len() - suffix.len()..)?;
    if !head.eq_ignore_ascii_case(prefix) || !tail.eq_ignore_ascii_case(suffix) {
        return None;
    }
    segment.get(prefix.len()..segment.len() - suffix.len())
}
