//! Dependency spec strings and version syntax.
//!
//! A spec is `"name"` or `"name <constraint>"`: `"python >=3.8"`,
//! `"numpy 1.21.*"`, `"netCDF4"`. Constraints are validated against
//! `semver::VersionReq`, which covers every form the recipe corpus uses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PACKAGE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9][A-Za-z0-9]*(\.[A-Za-z0-9]+)*([+-][A-Za-z0-9.]+)?$").unwrap());

/// A single parsed dependency spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub name: String,
    /// Everything after the first whitespace run, trimmed.
    pub constraint: Option<String>,
}

impl DependencySpec {
    /// Split a spec string into name and constraint. Returns `None` for
    /// blank input; malformed names still parse so the linter can report
    /// them with context.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => {
                let constraint = rest.trim();
                Some(Self {
                    name: name.to_string(),
                    constraint: (!constraint.is_empty()).then(|| constraint.to_string()),
                })
            }
            None => Some(Self {
                name: trimmed.to_string(),
                constraint: None,
            }),
        }
    }

    pub fn name_is_valid(&self) -> bool {
        PACKAGE_NAME_RE.is_match(&self.name)
    }

    /// Whether the constraint is one a resolver could act on. `==` (the
    /// pip spelling of an exact pin) is normalized to `=` before checking.
    pub fn constraint_is_valid(&self) -> bool {
        match self.constraint.as_deref() {
            None => true,
            Some(c) => {
                let normalized = c.strip_prefix("==").map(|rest| format!("={rest}"));
                semver::VersionReq::parse(normalized.as_deref().unwrap_or(c)).is_ok()
            }
        }
    }
}

impl std::fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.constraint {
            Some(c) => write!(f, "{} {}", self.name, c),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Whether a string is a plausible package name (`am-radiation-scripts`,
/// `netCDF4`).
pub fn is_valid_package_name(s: &str) -> bool {
    PACKAGE_NAME_RE.is_match(s)
}

/// Whether a string is a well-formed package version: starts with a digit,
/// dot-separated alphanumeric segments, optional `+local` / `-suffix` tail.
pub fn is_well_formed_version(s: &str) -> bool {
    VERSION_RE.is_match(s)
}
