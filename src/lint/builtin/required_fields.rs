use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::{Recipe, SourceKind};

/// KILN-001: Required Fields
///
/// A recipe the pipeline can act on needs a package name and version, a
/// build script, and a source. Empty and whitespace-only values count as
/// missing: the schema parses them, the pipeline cannot use them.
pub struct RequiredFields;

impl Check for RequiredFields {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-001".into(),
            name: "Required Fields".into(),
            description: "package.name, package.version, build.script, and a source must be present and non-empty".into(),
            default_severity: Severity::Critical,
            category: DefectCategory::Schema,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();

        let mut missing = |field: &str, hint: &str| {
            findings.push(Finding {
                check_id: "KILN-001".into(),
                check_name: "Required Fields".into(),
                severity: Severity::Critical,
                category: DefectCategory::Schema,
                message: format!("required field `{field}` is missing or empty"),
                field: Some(field.into()),
                hint: Some(hint.into()),
            });
        };

        if recipe.package.name.trim().is_empty() {
            missing("package.name", "set the package name");
        }
        if recipe.package.version.trim().is_empty() {
            missing("package.version", "set the package version");
        }
        if recipe.build.script_is_empty() {
            missing("build.script", "declare the install invocation, e.g. `pip install .`");
        }
        if matches!(recipe.source.kind(), SourceKind::Missing) {
            missing("source", "declare either source.url or source.path");
        }

        findings
    }
}
