use crate::error::Result;
use crate::lint::{Finding, Severity};

use serde_json::{json, Value};

/// Render findings as SARIF 2.1.0.
///
/// Produces a self-contained SARIF log compatible with GitHub Code Scanning
/// and other SARIF consumers. Findings point at the recipe file; TOML
/// line positions are not tracked, so results carry the field path in
/// `properties` instead of a region.
pub fn render(findings: &[Finding], recipe_path: &str) -> Result<String> {
    let rules: Vec<Value> = findings
        .iter()
        .map(|f| &f.check_id)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(|check_id| {
            let finding = findings.iter().find(|f| &f.check_id == check_id).unwrap();
            json!({
                "id": finding.check_id,
                "name": finding.check_name,
                "shortDescription": { "text": finding.check_name },
                "defaultConfiguration": {
                    "level": severity_to_sarif_level(finding.severity),
                },
                "properties": {
                    "tags": [finding.category.to_string()],
                },
            })
        })
        .collect();

    let results: Vec<Value> = findings
        .iter()
        .map(|f| {
            let mut result = json!({
                "ruleId": f.check_id,
                "level": severity_to_sarif_level(f.severity),
                "message": { "text": f.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": recipe_path,
                        },
                    },
                }],
            });

            if let Some(field) = &f.field {
                result["properties"] = json!({
                    "field": field,
                });
            }

            if let Some(hint) = &f.hint {
                result["fixes"] = json!([{
                    "description": { "text": hint },
                }]);
            }

            result
        })
        .collect();

    let sarif = json!({
        "$schema": "https://docs.oasis-open.org/sarif/sarif/v2.1.0/errata01/os/schemas/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "kiln",
                    "informationUri": "https://github.com/kiln-build/kiln",
                    "version": env!("CARGO_PKG_VERSION"),
                    "semanticVersion": env!("CARGO_PKG_VERSION"),
                    "rules": rules,
                },
            },
            "results": results,
            "automationDetails": {
                "id": format!("kiln/{}", recipe_path),
            },
        }],
    });

    let output = serde_json::to_string_pretty(&sarif)?;
    Ok(output)
}

fn severity_to_sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low | Severity::Info => "note",
    }
}
