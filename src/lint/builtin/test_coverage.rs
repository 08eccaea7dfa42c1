use std::collections::HashSet;

use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::{DependencySpec, Recipe};

/// Shell words and interpreters the test stage can always resolve without a
/// declared dependency.
const KNOWN_RUNNERS: &[&str] = &[
    "sh", "bash", "python", "python3", "test", "true", "false", "echo", "cd",
];

/// KILN-005: Test Coverage
///
/// A recipe with no import checks and no commands ships untested. A command
/// whose runner is neither a run dependency nor in test.requires will fail
/// at test time with "command not found" instead of here.
pub struct TestCoverage;

impl Check for TestCoverage {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-005".into(),
            name: "Test Coverage".into(),
            description: "recipes should declare tests, and test runners must be declared".into(),
            default_severity: Severity::Medium,
            category: DefectCategory::Testing,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();

        if recipe.test.is_empty() {
            findings.push(finding(
                Severity::Low,
                "recipe declares no import checks and no test commands".into(),
                "test",
                "list the package's top-level modules in test.imports",
            ));
            return findings;
        }

        let declared = declared_names(recipe);
        for (index, command) in recipe.test.commands.iter().enumerate() {
            let Some(runner) = command.split_whitespace().next() else {
                continue;
            };
            if !declared.contains(&runner.to_ascii_lowercase()) {
                findings.push(finding(
                    Severity::Medium,
                    format!("test command runs `{runner}` but nothing declares it"),
                    &format!("test.commands[{index}]"),
                    &format!("add `{runner}` to test.requires or requirements.run"),
                ));
            }
        }

        for (index, pattern) in recipe.test.source_files.iter().enumerate() {
            if glob::Pattern::new(pattern).is_err() {
                findings.push(finding(
                    Severity::Medium,
                    format!("`{pattern}` is not a valid glob pattern"),
                    &format!("test.source_files[{index}]"),
                    "see the glob syntax: `*`, `?`, `[...]` and `**`",
                ));
            }
        }

        findings
    }
}

fn declared_names(recipe: &Recipe) -> HashSet<String> {
    let mut names: HashSet<String> = KNOWN_RUNNERS.iter().map(|r| r.to_string()).collect();
    let declared = recipe.test.requires.iter().chain(&recipe.requirements.run);
    for entry in declared {
        if let Some(spec) = DependencySpec::parse(entry) {
            names.insert(spec.name.to_ascii_lowercase());
        }
    }
    names
}

fn finding(severity: Severity, message: String, field: &str, hint: &str) -> Finding {
    Finding {
        check_id: "KILN-005".into(),
        check_name: "Test Coverage".into(),
        severity,
        category: DefectCategory::Testing,
        message,
        field: Some(field.into()),
        hint: Some(hint.into()),
    }
}
