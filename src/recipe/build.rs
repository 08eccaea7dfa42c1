use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// How to turn the fetched source into an installed package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Install invocation, run through the platform shell in the staged
    /// source directory (e.g. `pip install .`).
    #[serde(default)]
    pub script: String,
    /// Build number, bumped when the recipe changes but the version does not.
    #[serde(default)]
    pub number: u32,
    /// Platform selectors this recipe must not build on (`win`, `linux`,
    /// `osx`).
    #[serde(default)]
    pub skip: Vec<String>,
}

impl BuildSection {
    pub fn script_is_empty(&self) -> bool {
        self.script.trim().is_empty()
    }

    /// Whether the skip list names the given platform. Unrecognized
    /// selectors never match; the linter reports them separately.
    pub fn skips(&self, platform: Platform) -> bool {
        self.skip
            .iter()
            .any(|s| Platform::from_selector(s) == Some(platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_matches_selector_aliases() {
        let build = BuildSection {
            skip: vec!["windows".into()],
            ..Default::default()
        };
        assert!(build.skips(Platform::Windows));
        assert!(!build.skips(Platform::Linux));
    }

    #[test]
    fn unknown_selectors_never_match() {
        let build = BuildSection {
            skip: vec!["beos".into()],
            ..Default::default()
        };
        for &platform in crate::platform::ALL {
            assert!(!build.skips(platform));
        }
    }

    #[test]
    fn whitespace_script_is_empty() {
        let build = BuildSection {
            script: "  \n".into(),
            ..Default::default()
        };
        assert!(build.script_is_empty());
    }
}
