use crate::lint::{Finding, Severity, Verdict};
use crate::pipeline::{BuildReport, StageStatus};

/// Render findings as console output, most severe first, then by field.
pub fn render(findings: &[Finding], verdict: &Verdict) -> String {
    let mut output = String::new();

    if findings.is_empty() {
        output.push_str("\n  No recipe defects detected.\n\n");
        return output;
    }

    let mut sorted: Vec<&Finding> = findings.iter().collect();
    sorted.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.field.cmp(&b.field))
    });

    output.push_str(&format!("\n  {} finding(s):\n\n", findings.len()));

    for finding in &sorted {
        let severity_tag = match finding.severity {
            Severity::Critical => "[CRITICAL]",
            Severity::High => "[HIGH]    ",
            Severity::Medium => "[MEDIUM]  ",
            Severity::Low => "[LOW]     ",
            Severity::Info => "[INFO]    ",
        };

        output.push_str(&format!(
            "  {} {} {}\n",
            severity_tag, finding.check_id, finding.message
        ));
        if let Some(field) = &finding.field {
            output.push_str(&format!("           at {}\n", field));
        }
        if let Some(hint) = &finding.hint {
            output.push_str(&format!("           hint: {}\n", hint));
        }
        output.push('\n');
    }

    let status = if verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "  Result: {} (threshold: {}, highest: {})\n\n",
        status,
        verdict.fail_threshold,
        verdict
            .highest_severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".into()),
    ));

    output
}

/// Render a build report stage by stage.
pub fn render_build(report: &BuildReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n  {} {} (run {})\n\n",
        report.package, report.version, report.run_id
    ));

    if report.skipped {
        let platform = report
            .platform
            .map(|p| p.to_string())
            .unwrap_or_else(|| "this platform".into());
        output.push_str(&format!("  Skipped: build.skip matches {}\n\n", platform));
        return output;
    }

    for stage in &report.stages {
        let tag = match stage.status {
            StageStatus::Passed => "[ OK ]",
            StageStatus::Failed => "[FAIL]",
            StageStatus::Skipped => "[SKIP]",
        };
        output.push_str(&format!(
            "  {} {:<5} {} ({} ms)\n",
            tag,
            stage.stage.to_string(),
            stage.detail,
            stage.duration_ms
        ));
    }

    let status = if report.success { "PASS" } else { "FAIL" };
    output.push_str(&format!("\n  Result: {}\n\n", status));
    output
}
