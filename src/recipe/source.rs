use serde::{Deserialize, Serialize};

/// Where the distribution to build comes from.
///
/// Exactly one of `url` (remote archive) or `path` (local directory,
/// relative to the recipe file) should be set; the linter flags every other
/// combination. `sha256` is the integrity input for url sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// The shape of a source section once empty strings are discounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind<'a> {
    Url(&'a str),
    Path(&'a str),
    /// Both url and path are set; ambiguous, rejected downstream.
    Conflicting,
    Missing,
}

impl SourceSection {
    pub fn kind(&self) -> SourceKind<'_> {
        let url = self.url.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let path = self.path.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (url, path) {
            (Some(_), Some(_)) => SourceKind::Conflicting,
            (Some(u), None) => SourceKind::Url(u),
            (None, Some(p)) => SourceKind::Path(p),
            (None, None) => SourceKind::Missing,
        }
    }

    /// The declared checksum, trimmed, if it is non-blank.
    pub fn checksum(&self) -> Option<&str> {
        self.sha256
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether a declared checksum is a plausible sha256 digest
    /// (64 hex digits).
    pub fn checksum_is_well_formed(&self) -> bool {
        match self.checksum() {
            Some(sum) => sum.len() == 64 && sum.chars().all(|c| c.is_ascii_hexdigit()),
            None => false,
        }
    }
}
