use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::spec::{is_valid_package_name, is_well_formed_version};
use crate::recipe::Recipe;

/// KILN-003: Identity Syntax
///
/// Validates the shape of `package.name` and `package.version`. Empty
/// values are KILN-001's territory; this check only fires on values that
/// are present but malformed.
pub struct IdentitySyntax;

impl Check for IdentitySyntax {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-003".into(),
            name: "Identity Syntax".into(),
            description: "package name and version must follow index naming rules".into(),
            default_severity: Severity::High,
            category: DefectCategory::Schema,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut invalid = |field: &str, message: String, hint: &str| {
            findings.push(Finding {
                check_id: "KILN-003".into(),
                check_name: "Identity Syntax".into(),
                severity: Severity::High,
                category: DefectCategory::Schema,
                message,
                field: Some(field.into()),
                hint: Some(hint.into()),
            });
        };

        let name = recipe.package.name.trim();
        if !name.is_empty() && !is_valid_package_name(name) {
            invalid(
                "package.name",
                format!("`{name}` is not a valid package name"),
                "use lowercase letters, digits, `.`, `_` and `-`, starting with a letter or digit",
            );
        }

        let version = recipe.package.version.trim();
        if !version.is_empty() && !is_well_formed_version(version) {
            invalid(
                "package.version",
                format!("`{version}` is not a well-formed version"),
                "versions are dotted alphanumeric segments, e.g. `1.2.0` or `2024.4.1`",
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Check;

    fn recipe(text: &str) -> Recipe {
        Recipe::from_str(text).unwrap()
    }

    #[test]
    fn valid_identity_is_clean() {
        let r = recipe("[package]\nname = \"am-radiation-scripts\"\nversion = \"0.1.0\"\n");
        assert!(IdentitySyntax.run(&r).is_empty());
    }

    #[test]
    fn bad_name_and_version_each_fire() {
        let r = recipe("[package]\nname = \"-bad name\"\nversion = \"not a version\"\n");
        let findings = IdentitySyntax.run(&r);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].field.as_deref(), Some("package.name"));
        assert_eq!(findings[1].field.as_deref(), Some("package.version"));
    }

    #[test]
    fn empty_fields_are_left_to_required_fields() {
        assert!(IdentitySyntax.run(&recipe("")).is_empty());
    }

    #[test]
    fn calendar_versions_pass() {
        let r = recipe("[package]\nname = \"a\"\nversion = \"2024.4.1\"\n");
        assert!(IdentitySyntax.run(&r).is_empty());
    }
}
