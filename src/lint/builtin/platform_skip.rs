use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::platform::{Platform, ALL};
use crate::recipe::Recipe;

const SELECTOR_SPELLINGS: &[&str] = &["linux", "osx", "win", "macos", "darwin", "windows"];

/// KILN-007: Platform Skip
///
/// Unrecognized selectors in build.skip silently match nothing, so a typo
/// like `wni` ships a recipe to the very platform it meant to exclude.
pub struct PlatformSkip;

impl Check for PlatformSkip {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-007".into(),
            name: "Platform Skip".into(),
            description: "build.skip selectors must name known platforms".into(),
            default_severity: Severity::Medium,
            category: DefectCategory::Portability,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, selector) in recipe.build.skip.iter().enumerate() {
            if Platform::from_selector(selector).is_some() {
                continue;
            }
            let hint = match super::nearest(SELECTOR_SPELLINGS, selector) {
                Some(candidate) => format!("did you mean `{candidate}`?"),
                None => "valid selectors are linux, osx and win".into(),
            };
            findings.push(finding(
                format!("`{selector}` is not a platform selector"),
                format!("build.skip[{index}]"),
                hint,
            ));
        }

        if !recipe.build.skip.is_empty() && ALL.iter().all(|&p| recipe.build.skips(p)) {
            findings.push(finding(
                "build.skip disables every supported platform".into(),
                "build.skip".into(),
                "keep at least one platform buildable, or retire the recipe".into(),
            ));
        }

        findings
    }
}

fn finding(message: String, field: String, hint: String) -> Finding {
    Finding {
        check_id: "KILN-007".into(),
        check_name: "Platform Skip".into(),
        severity: Severity::Medium,
        category: DefectCategory::Portability,
        message,
        field: Some(field),
        hint: Some(hint),
    }
}
