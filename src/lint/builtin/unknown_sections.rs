use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::{Recipe, KNOWN_SECTIONS};

/// KILN-008: Unknown Sections
///
/// Top-level keys outside the schema parse fine and are then ignored, so a
/// misspelled `[requirments]` drops every dependency on the floor.
pub struct UnknownSections;

impl Check for UnknownSections {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-008".into(),
            name: "Unknown Sections".into(),
            description: "top-level keys must be schema sections".into(),
            default_severity: Severity::Medium,
            category: DefectCategory::Schema,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        recipe
            .unknown
            .keys()
            .map(|key| {
                let hint = match super::nearest(KNOWN_SECTIONS, key) {
                    Some(candidate) => format!("did you mean `[{candidate}]`?"),
                    None => format!("known sections: {}", KNOWN_SECTIONS.join(", ")),
                };
                Finding {
                    check_id: "KILN-008".into(),
                    check_name: "Unknown Sections".into(),
                    severity: Severity::Medium,
                    category: DefectCategory::Schema,
                    message: format!("`{key}` is not a recipe section and will be ignored"),
                    field: Some(key.clone()),
                    hint: Some(hint),
                }
            })
            .collect()
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
    fn schema_sections_are_clean() {
        let r = recipe("[package]\nname = \"a\"\nversion = \"1\"\n\n[about]\nlicense = \"MIT\"\n");
        assert!(UnknownSections.run(&r).is_empty());
    }

    #[test]
    fn misspelled_section_gets_a_suggestion() {
        let r = recipe("[requirments]\nrun = [\"numpy\"]\n");
        let findings = UnknownSections.run(&r);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field.as_deref(), Some("requirments"));
        assert_eq!(findings[0].hint.as_deref(), Some("did you mean `[requirements]`?"));
    }

    #[test]
    fn unrelated_section_lists_the_schema() {
        let r = recipe("[deploy]\ntarget = \"prod\"\n");
        let findings = UnknownSections.run(&r);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].hint.as_deref().unwrap().starts_with("known sections:"));
    }
}
