use std::collections::HashMap;

use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::{DependencySpec, Recipe};

/// KILN-004: Dependency Specs
///
/// Parses every entry of requirements.build/host/run and test.requires as
/// `name [constraint]` and validates both halves. Also flags entries that
/// name the same package twice within one list, which usually means two
/// authors edited the recipe without reading it.
pub struct DependencySpecs;

impl Check for DependencySpecs {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-004".into(),
            name: "Dependency Specs".into(),
            description: "dependency entries must be `name [constraint]` with valid halves".into(),
            default_severity: Severity::Medium,
            category: DefectCategory::Dependencies,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut lists: Vec<(String, &[String])> = recipe
            .requirements
            .phases()
            .into_iter()
            .map(|(phase, entries)| (format!("requirements.{phase}"), entries))
            .collect();
        lists.push(("test.requires".into(), &recipe.test.requires));

        for (field, entries) in lists {
            check_list(&field, entries, &mut findings);
        }
        findings
    }
}

fn check_list(field: &str, entries: &[String], findings: &mut Vec<Finding>) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let position = format!("{field}[{index}]");
        let Some(spec) = DependencySpec::parse(entry) else {
            findings.push(finding(
                Severity::Medium,
                format!("entry {index} of {field} is blank"),
                &position,
                "remove the empty entry or fill in a package name",
            ));
            continue;
        };

        if !spec.name_is_valid() {
            findings.push(finding(
                Severity::Medium,
                format!("`{}` is not a valid package name", spec.name),
                &position,
                "names are lowercase alphanumerics plus `.`, `_` and `-`",
            ));
        }
        if !spec.constraint_is_valid() {
            // constraint_is_valid is vacuously true when no constraint is given
            let constraint = spec.constraint.as_deref().unwrap_or_default();
            findings.push(finding(
                Severity::Medium,
                format!("`{}` has an unparseable constraint `{constraint}`", spec.name),
                &position,
                "use comparator syntax such as `>=3.8`, `1.21.*` or `>=1.21, <2`",
            ));
        }

        if let Some(first) = seen.insert(spec.name.to_ascii_lowercase(), index) {
            findings.push(finding(
                Severity::Low,
                format!("`{}` appears at both {field}[{first}] and {field}[{index}]", spec.name),
                &position,
                "keep a single entry per package and merge the constraints",
            ));
        }
    }
}

fn finding(severity: Severity, message: String, field: &str, hint: &str) -> Finding {
    Finding {
        check_id: "KILN-004".into(),
        check_name: "Dependency Specs".into(),
        severity,
        category: DefectCategory::Dependencies,
        message,
        field: Some(field.into()),
        hint: Some(hint.into()),
    }
}
