use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Descriptive metadata. None of it affects the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AboutSection {
    #[serde(default)]
    pub homepage: Option<String>,
    /// License identifier (ideally an SPDX expression).
    #[serde(default)]
    pub license: Option<String>,
    /// Path to the license text inside the source tree.
    #[serde(default)]
    pub license_file: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Free-form extras. `maintainers` is the one key kiln understands;
/// everything else passes through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraSection {
    #[serde(default)]
    pub maintainers: Vec<String>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, toml::Value>,
}
