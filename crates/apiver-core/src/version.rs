//! API version type, parsing and formatting
//!
//! Versions have the form `{major}.{minor}[-{status}]`, e.g. `1.0`, `2.1`
//! or `3.0-beta`.

use crate::error::{Result, VersioningError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An API version
///
/// Ordered by major, then minor, then status. A version without a status
/// sorts before any version carrying one, and statuses compare ordinally
/// ignoring ASCII case. Equality and hashing follow the same rules.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
    status: Option<String>,
}

impl ApiVersion {
    /// Create a version without a status
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            status: None,
        }
    }

    /// Attach a status such as `beta` or `rc.1`
    ///
    /// Fails with [`VersioningError::InvalidFormat`] when the status is empty
    /// or contains characters other than ASCII alphanumerics, `.` and `-`.
    pub fn with_status(mut self, status: impl Into<String>) -> Result<Self> {
        let status = status.into();
        if !is_valid_status(&status) {
            return Err(VersioningError::invalid_format(format!(
                "{}.{}-{}",
                self.major, self.minor, status
            )));
        }
        self.status = Some(status);
        Ok(self)
    }

    /// Parse the canonical text form
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || VersioningError::invalid_format(text);
        let trimmed = text.trim();

        let (numbers, status) = match trimmed.split_once('-') {
            Some((numbers, status)) => (numbers, Some(status)),
            None => (trimmed, None),
        };

        let (major, minor) = numbers.split_once('.').ok_or_else(invalid)?;
        let major = parse_number(major).ok_or_else(invalid)?;
        let minor = parse_number(minor).ok_or_else(invalid)?;

        let status = match status {
            Some(status) if is_valid_status(status) => Some(status.to_string()),
            Some(_) => return Err(invalid()),
            None => None,
        };

        Ok(Self {
            major,
            minor,
            status,
        })
    }

    /// Parse the group name form produced by [`VersionFormat::GroupName`]
    pub fn from_group_name(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let stripped = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .ok_or_else(|| VersioningError::invalid_format(text))?;
        Self::parse(stripped).map_err(|_| VersioningError::invalid_format(text))
    }

    /// Major version number
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor version number
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Optional status label
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Format the version
    pub fn format(&self, format: VersionFormat<'_>) -> String {
        match format {
            VersionFormat::Canonical => self.to_string(),
            VersionFormat::MajorMinor => format!("{}.{}", self.major, self.minor),
            VersionFormat::Major => self.major.to_string(),
            VersionFormat::GroupName => format!("v{}", self),
            VersionFormat::Pattern(pattern) => pattern
                .replace("{major}", &self.major.to_string())
                .replace("{minor}", &self.minor.to_string())
                .replace("{status}", &self.status_suffix()),
        }
    }

    fn status_suffix(&self) -> String {
        self.status
            .as_deref()
            .map(|status| format!("-{}", status))
            .unwrap_or_default()
    }
}

/// Output forms supported by [`ApiVersion::format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFormat<'a> {
    /// `1.0` or `1.0-beta`
    Canonical,
    /// `1.0`, status dropped
    MajorMinor,
    /// `1`
    Major,
    /// `v1.0` or `v1.0-beta`, used to group API descriptions
    GroupName,
    /// Custom pattern with `{major}`, `{minor}` and `{status}` placeholders.
    ///
    /// `{status}` expands to `-status`, or nothing when there is no status.
    Pattern(&'a str),
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_valid_status(status: &str) -> bool {
    !status.is_empty()
        && status
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}

fn cmp_status(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(b.bytes().map(|b| b.to_ascii_lowercase()))
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(status) = &self.status {
            write!(f, "-{}", status)?;
        }
        Ok(())
    }
}

impl FromStr for ApiVersion {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| match (&self.status, &other.status) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => cmp_status(a, b),
            })
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}

impl Hash for ApiVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        if let Some(status) = &self.status {
            for b in status.bytes() {
                state.write_u8(b.to_ascii_lowercase());
            }
        }
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}
