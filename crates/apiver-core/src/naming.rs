//! Group name conventions
//!
//! Declared group names often carry a type suffix and a version digit
//! (`Orders2Controller`). The logical name used for sunset lookups and API
//! grouping is derived from the declared name by one of these conventions.

use serde::{Deserialize, Serialize};

const SUFFIX: &str = "Controller";

/// How a declared group name maps to its logical name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupNameConvention {
    /// Trim the `Controller` suffix and any trailing digits: `Values2Controller` → `Values`
    #[default]
    Default,
    /// Trim the `Controller` suffix only: `Values2Controller` → `Values2`
    Original,
    /// Normalize like `Original`, then drop trailing digits when grouping
    Grouped,
}

impl GroupNameConvention {
    /// Normalize a declared name
    pub fn normalize_name<'a>(&self, name: &'a str) -> &'a str {
        match self {
            Self::Default => trim_digits(trim_suffix(name)),
            Self::Original | Self::Grouped => trim_suffix(name),
        }
    }

    /// Group name for an already normalized name
    pub fn group_name<'a>(&self, name: &'a str) -> &'a str {
        match self {
            Self::Default | Self::Original => name,
            Self::Grouped => trim_digits(name),
        }
    }

    /// Logical name: the group name of the normalized name
    pub fn logical_name<'a>(&self, name: &'a str) -> &'a str {
        self.group_name(self.normalize_name(name))
    }
}

fn trim_suffix(name: &str) -> &str {
    match name.strip_suffix(SUFFIX) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => name,
    }
}

fn trim_digits(name: &str) -> &str {
    let trimmed = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() {
        name
    } else {
        trimmed
    }
}
