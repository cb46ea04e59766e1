//! Sunset policies
//!
//! A sunset policy tells clients when a version goes away and where to read
//! about it. Policies are registered per `(name, version)` key at startup and
//! resolved per request, most specific key first:
//!
//! 1. `(name, version)`
//! 2. `(*, version)`
//! 3. `(name, *)`
//! 4. `(*, *)`

use crate::error::{Result, VersioningError};
use crate::version::ApiVersion;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Response header carrying the sunset date
pub const SUNSET_HEADER: &str = "sunset";
/// Response header carrying the sunset link
pub const LINK_HEADER: &str = "link";

/// Link to human readable sunset information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SunsetLink {
    uri: String,
    title: Option<String>,
    media_type: Option<String>,
}

impl SunsetLink {
    /// Create a link to `uri`
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
            media_type: None,
        }
    }

    /// Set the link title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the media type of the linked document
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Target URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// `Link` header value with `rel="sunset"`
    pub fn header_value(&self) -> String {
        let mut value = format!("<{}>; rel=\"sunset\"", self.uri);
        if let Some(title) = &self.title {
            value.push_str(&format!("; title=\"{}\"", title));
        }
        if let Some(media_type) = &self.media_type {
            value.push_str(&format!("; type=\"{}\"", media_type));
        }
        value
    }
}

/// When and how a version is retired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SunsetPolicy {
    effective_date: Option<DateTime<Utc>>,
    link: Option<SunsetLink>,
    linked_policy_name: Option<String>,
}

impl SunsetPolicy {
    /// Create an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Date the version stops being served
    pub fn effective(mut self, date: DateTime<Utc>) -> Self {
        self.effective_date = Some(date);
        self
    }

    /// Attach a sunset link
    pub fn with_link(mut self, link: SunsetLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Inherit missing fields from the policy registered under another name
    pub fn linked_to(mut self, name: impl Into<String>) -> Self {
        self.linked_policy_name = Some(name.into());
        self
    }

    /// Sunset date, if any
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.effective_date
    }

    /// Sunset link, if any
    pub fn link(&self) -> Option<&SunsetLink> {
        self.link.as_ref()
    }

    /// Name of the policy this one inherits from
    pub fn linked_policy_name(&self) -> Option<&str> {
        self.linked_policy_name.as_deref()
    }

    /// `Sunset` header value in IMF-fixdate form
    pub fn http_date(&self) -> Option<String> {
        self.effective_date
            .map(|date| date.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
    }

    /// Response headers describing this policy
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if let Some(date) = self.http_date() {
            headers.push((SUNSET_HEADER, date));
        }
        if let Some(link) = &self.link {
            headers.push((LINK_HEADER, link.header_value()));
        }
        headers
    }

    fn inherit(&mut self, linked: &SunsetPolicy) {
        if self.effective_date.is_none() {
            self.effective_date = linked.effective_date;
        }
        if self.link.is_none() {
            self.link = linked.link.clone();
        }
        self.linked_policy_name = linked.linked_policy_name.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PolicyKey {
    name: Option<String>,
    version: Option<ApiVersion>,
}

impl PolicyKey {
    fn new(name: Option<&str>, version: Option<&ApiVersion>) -> Self {
        Self {
            name: name.map(str::to_ascii_lowercase),
            version: version.cloned(),
        }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("*");
        match &self.version {
            Some(version) => write!(f, "({}, {})", name, version),
            None => write!(f, "({}, *)", name),
        }
    }
}

/// Append-only registry of sunset policies
///
/// Register everything during startup, then share the manager read-only.
#[derive(Debug, Clone, Default)]
pub struct SunsetPolicyManager {
    policies: HashMap<PolicyKey, SunsetPolicy>,
}

impl SunsetPolicyManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a policy; `None` acts as a wildcard for that key part
    ///
    /// Names compare ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// [`VersioningError::DuplicateKey`] if the key is already registered.
    pub fn add_policy(
        &mut self,
        name: Option<&str>,
        version: Option<ApiVersion>,
        policy: SunsetPolicy,
    ) -> Result<()> {
        let key = PolicyKey::new(name, version.as_ref());
        if self.policies.contains_key(&key) {
            return Err(VersioningError::DuplicateKey {
                key: key.to_string(),
            });
        }
        tracing::debug!(key = %key, "sunset policy registered");
        self.policies.insert(key, policy);
        Ok(())
    }

    /// Find the most specific policy for `(name, version)`
    pub fn try_resolve_policy(
        &self,
        name: Option<&str>,
        version: Option<&ApiVersion>,
    ) -> Option<&SunsetPolicy> {
        let mut keys = Vec::with_capacity(4);
        if name.is_some() && version.is_some() {
            keys.push(PolicyKey::new(name, version));
        }
        if version.is_some() {
            keys.push(PolicyKey::new(None, version));
        }
        if name.is_some() {
            keys.push(PolicyKey::new(name, None));
        }
        keys.push(PolicyKey::new(None, None));

        keys.iter().find_map(|key| self.policies.get(key))
    }

    /// Resolve a policy and fill its gaps from linked policies
    ///
    /// Each `linked_policy_name` is looked up by that exact name, first with
    /// the same version and then for any version; wildcard-name policies are
    /// never reached through a link. Fields of the more specific policy win;
    /// a cycle or a dangling link stops the walk.
    pub fn resolve_effective(
        &self,
        name: Option<&str>,
        version: Option<&ApiVersion>,
    ) -> Option<SunsetPolicy> {
        let mut policy = self.try_resolve_policy(name, version)?.clone();
        let mut visited: HashSet<String> = name.map(str::to_ascii_lowercase).into_iter().collect();

        while let Some(linked_name) = policy.linked_policy_name.clone() {
            if !visited.insert(linked_name.to_ascii_lowercase()) {
                break;
            }
            match self.linked_policy(&linked_name, version) {
                Some(linked) => policy.inherit(linked),
                None => break,
            }
        }

        Some(policy)
    }

    fn linked_policy(&self, name: &str, version: Option<&ApiVersion>) -> Option<&SunsetPolicy> {
        version
            .and_then(|version| self.policies.get(&PolicyKey::new(Some(name), Some(version))))
            .or_else(|| self.policies.get(&PolicyKey::new(Some(name), None)))
    }

    /// Number of registered policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
