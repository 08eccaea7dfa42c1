//! Tool configuration.
//!
//! Settings that belong to the environment rather than the recipe live in
//! `kiln.toml` next to the recipe (or wherever `--config` points): the lint
//! policy and fetch behavior. Everything has a default, so the file is
//! optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KilnError, Result};
use crate::lint::Policy;

/// Config file name probed next to the recipe.
pub const DEFAULT_FILE_NAME: &str = "kiln.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub policy: Policy,
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    /// Seconds before a source download is abandoned.
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| KilnError::Config(format!(
            "cannot read {}: {e}",
            path.display()
        )))?;
        toml::from_str(&text)
            .map_err(|e| KilnError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Load `kiln.toml` from `dir` if it exists, defaults otherwise. A file
    /// that exists but does not parse is an error, not a silent default.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(DEFAULT_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
