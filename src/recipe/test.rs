use serde::{Deserialize, Serialize};

/// Post-build verification: imports that must resolve, commands that must
/// succeed, and the files they need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSection {
    /// Module names probed with `<python> -c "import <name>"`.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Extra dependency specs the test phase needs (e.g. `pytest`). Kiln
    /// validates these; installing them is the caller's job.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Shell commands run in the test working directory.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Glob patterns, resolved against the staged source tree, naming files
    /// to copy into the test working directory (so `pytest tests` can see
    /// the suite).
    #[serde(default)]
    pub source_files: Vec<String>,
}

impl TestSection {
    /// True when the section verifies nothing at all.
    pub fn is_empty(&self) -> bool {
        self.imports.iter().all(|s| s.trim().is_empty())
            && self.commands.iter().all(|s| s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_detected() {
        assert!(TestSection::default().is_empty());

        let blank = TestSection {
            commands: vec!["  ".into()],
            ..Default::default()
        };
        assert!(blank.is_empty());
    }

    #[test]
    fn imports_alone_count() {
        let section = TestSection {
            imports: vec!["am_radiation_scripts".into()],
            ..Default::default()
        };
        assert!(!section.is_empty());
    }
}
