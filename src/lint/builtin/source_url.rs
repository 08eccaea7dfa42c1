use url::Url;

use crate::lint::{Check, CheckMetadata, DefectCategory, Finding, Severity};
use crate::recipe::{Recipe, SourceKind};

/// KILN-006: Source Location
///
/// The fetch stage needs exactly one usable location: an http(s) url or a
/// local path. Here we reject ambiguous sources and urls that can never be
/// downloaded.
pub struct SourceUrl;

impl Check for SourceUrl {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            id: "KILN-006".into(),
            name: "Source Location".into(),
            description: "source must name one fetchable location".into(),
            default_severity: Severity::High,
            category: DefectCategory::Integrity,
        }
    }

    fn run(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut flag = |message: String, field: &str, hint: &str| {
            findings.push(Finding {
                check_id: "KILN-006".into(),
                check_name: "Source Location".into(),
                severity: Severity::High,
                category: DefectCategory::Integrity,
                message,
                field: Some(field.into()),
                hint: Some(hint.into()),
            });
        };

        match recipe.source.kind() {
            SourceKind::Conflicting => flag(
                "source declares both a url and a path".into(),
                "source",
                "keep exactly one of source.url and source.path",
            ),
            SourceKind::Url(raw) => match Url::parse(raw) {
                Err(e) => flag(
                    format!("`{raw}` cannot be parsed as a URL: {e}"),
                    "source.url",
                    "use an absolute URL like `https://host/pkg-1.0.tar.gz`",
                ),
                Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => flag(
                    format!("`{}` URLs cannot be fetched", parsed.scheme()),
                    "source.url",
                    "only http and https sources are supported",
                ),
                Ok(_) => {}
            },
            SourceKind::Path(_) | SourceKind::Missing => {}
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
    fn https_url_is_clean() {
        let r = recipe("[source]\nurl = \"https://example.com/pkg-1.0.tar\"\n");
        assert!(SourceUrl.run(&r).is_empty());
    }

    #[test]
    fn path_source_is_clean() {
        let r = recipe("[source]\npath = \"../pkg\"\n");
        assert!(SourceUrl.run(&r).is_empty());
    }

    #[test]
    fn url_and_path_together_conflict() {
        let r = recipe("[source]\nurl = \"https://example.com/a.tar\"\npath = \"./a\"\n");
        let findings = SourceUrl.run(&r);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field.as_deref(), Some("source"));
    }

    #[test]
    fn relative_url_is_rejected() {
        let r = recipe("[source]\nurl = \"example.com/a.tar\"\n");
        let findings = SourceUrl.run(&r);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("cannot be parsed"));
    }

    #[test]
    fn ftp_scheme_is_rejected() {
        let r = recipe("[source]\nurl = \"ftp://example.com/a.tar\"\n");
        let findings = SourceUrl.run(&r);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("ftp"));
    }
}
