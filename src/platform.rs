use serde::{Deserialize, Serialize};

/// A platform a recipe can be built on or skipped for.
///
/// Selector names follow the conda convention (`linux`, `osx`, `win`) since
/// that is what recipe authors write in `build.skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

/// Every platform kiln knows about, in selector order.
pub const ALL: &[Platform] = &[Platform::Linux, Platform::MacOs, Platform::Windows];

impl Platform {
    /// Canonical selector name as written in recipes.
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "osx",
            Self::Windows => "win",
        }
    }

    /// Parse a selector, accepting the common aliases recipe authors reach
    /// for (`macos`, `darwin`, `windows`).
    pub fn from_selector(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linux" => Some(Self::Linux),
            "osx" | "macos" | "darwin" => Some(Self::MacOs),
            "win" | "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// The platform this process is running on, if it is one kiln supports.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::MacOs),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_roundtrip() {
        for &platform in ALL {
            assert_eq!(Platform::from_selector(platform.selector()), Some(platform));
        }
    }

    #[test]
    fn aliases_accepted() {
        assert_eq!(Platform::from_selector("macos"), Some(Platform::MacOs));
        assert_eq!(Platform::from_selector("darwin"), Some(Platform::MacOs));
        assert_eq!(Platform::from_selector("windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_selector(" WIN "), Some(Platform::Windows));
    }

    #[test]
    fn unknown_selector_rejected() {
        assert_eq!(Platform::from_selector("beos"), None);
        assert_eq!(Platform::from_selector(""), None);
    }

    #[test]
    fn current_platform_is_known() {
        // CI runs on one of the three supported platforms.
        assert!(Platform::current().is_some());
    }
}
