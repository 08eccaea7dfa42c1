use crate::error::Result;
use crate::lint::{Finding, Verdict};
use crate::pipeline::BuildReport;

use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    verdict: &'a Verdict,
}

/// Render findings as a JSON report.
pub fn render(findings: &[Finding], verdict: &Verdict) -> Result<String> {
    let report = JsonReport { findings, verdict };
    let json = serde_json::to_string_pretty(&report)?;
    Ok(json)
}

/// Render a build report as JSON.
pub fn render_build(report: &BuildReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
