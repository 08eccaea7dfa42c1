pub mod builtin;
pub mod finding;
pub mod policy;

use crate::recipe::Recipe;

pub use finding::{CheckMetadata, DefectCategory, Finding, Severity};
pub use policy::{Policy, Verdict};

/// A check inspects a parsed recipe and reports defects.
pub trait Check: Send + Sync {
    /// Metadata about this check (id, name, default severity, category).
    fn metadata(&self) -> CheckMetadata;

    /// Run the check against a recipe.
    fn run(&self, recipe: &Recipe) -> Vec<Finding>;
}

/// The linter runs all registered checks against a recipe.
pub struct Linter {
    checks: Vec<Box<dyn Check>>,
}

impl Linter {
    /// Create a linter with all built-in checks registered.
    pub fn new() -> Self {
        Self {
            checks: builtin::all_checks(),
        }
    }

    /// Run every check against a recipe.
    pub fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        self.checks.iter().flat_map(|c| c.run(recipe)).collect()
    }

    /// List metadata for all registered checks.
    pub fn list_checks(&self) -> Vec<CheckMetadata> {
        self.checks.iter().map(|c| c.metadata()).collect()
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}
