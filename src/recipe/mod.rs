//! The recipe schema: a declarative description of how to fetch, build,
//! and test one software distribution.
//!
//! Recipes are TOML documents (`recipe.toml`). Parsing is deliberately
//! permissive where the linter is the better messenger: every section is
//! optional, required-but-empty fields parse fine (and become findings),
//! and unknown *top-level* keys are captured for the linter to report with
//! a suggestion. Unknown fields *inside* a known section are a parse error,
//! which keeps toml's span-accurate diagnostics.

pub mod about;
pub mod build;
pub mod requirements;
pub mod source;
pub mod spec;
pub mod test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KilnError, Result};

pub use about::{AboutSection, ExtraSection};
pub use build::BuildSection;
pub use requirements::RequirementsSection;
pub use source::{SourceKind, SourceSection};
pub use spec::DependencySpec;
pub use test::TestSection;

/// File name looked for when a directory is given instead of a recipe.
pub const DEFAULT_FILE_NAME: &str = "recipe.toml";

/// Top-level sections the schema defines, used for unknown-key suggestions.
pub const KNOWN_SECTIONS: &[&str] = &[
    "package",
    "source",
    "build",
    "requirements",
    "test",
    "about",
    "extra",
];

/// The package identity tuple.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// A parsed recipe document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub package: PackageSection,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub requirements: RequirementsSection,
    #[serde(default)]
    pub test: TestSection,
    #[serde(default)]
    pub about: AboutSection,
    #[serde(default)]
    pub extra: ExtraSection,
    /// Top-level keys outside the schema, kept for the linter.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl Recipe {
    pub fn from_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| KilnError::Parse {
            file: path.display().to_string(),
            message: format!("cannot read file: {e}"),
        })?;
        toml::from_str(&text).map_err(|e| KilnError::Parse {
            file: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Annotated starter recipe written by `kiln init`.
    pub fn starter_toml() -> &'static str {
        r#"# kiln recipe: how to fetch, build, and test one package.

[package]
name = "my-package"
version = "0.1.0"

[source]
# Remote archive plus its sha256, or a local directory via `path`.
url = "https://example.com/my-package-0.1.0.tar"
sha256 = ""

[build]
script = "pip install ."
number = 0
# Platforms this recipe must not build on: "linux", "osx", "win".
# skip = ["win"]

[requirements]
build = []
host = ["python", "pip"]
run = ["python"]

[test]
imports = ["my_package"]
requires = ["pytest"]
commands = ["pytest tests"]
# Files the test commands need, copied from the source tree.
source_files = ["tests/**"]

[about]
homepage = ""
license = ""
summary = ""
"#
    }
}

/// Accept either a recipe file or a directory containing `recipe.toml`.
pub fn locate(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
