use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::{Recipe, SourceKind};

/// KILN-002: Source Checksum
///
/// A url source without a sha256 cannot be verified, so the build is not
/// reproducible and the fetch stage will refuse it. A declared checksum
/// that is not 64 hex digits can never match anything and is worse than
/// none at all.
pub struct SourceChecksum;

impl Check for SourceChecksum {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-002".into(),
            name: "Source Checksum".into(),
            description: "url sources must declare a well-formed sha256 digest".into(),
            default_severity: Severity::High,
            category: DefectCategory::Integrity,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();
        let finding = |severity: Severity, message: String, hint: &str| Finding {
            check_id: "KILN-002".into(),
            check_name: "Source Checksum".into(),
            severity,
            category: DefectCategory::Integrity,
            message,
            field: Some("source.sha256".into()),
            hint: Some(hint.into()),
        };

        match recipe.source.kind() {
            SourceKind::Url(url) => match recipe.source.checksum() {
                None => findings.push(finding(
                    Severity::High,
                    format!("url source `{url}` declares no sha256 checksum"),
                    "record the archive digest: `sha256sum <archive>`",
                )),
                Some(sum) if !recipe.source.checksum_is_well_formed() => findings.push(finding(
                    Severity::Critical,
                    format!("`{sum}` is not a sha256 digest (expected 64 hex digits)"),
                    "re-run `sha256sum <archive>` and paste the full digest",
                )),
                Some(_) => {}
            },
            SourceKind::Path(_) => {
                if recipe.source.checksum().is_some() {
                    findings.push(finding(
                        Severity::Info,
                        "sha256 is ignored for path sources".into(),
                        "drop source.sha256 or switch to a url source",
                    ));
                }
            }
            SourceKind::Conflicting | SourceKind::Missing => {}
        }

        findings
    }
}
