pub mod console;
pub mod json;
pub mod sarif;

use serde::{Deserialize, Serialize};

use crate::error::{KilnError, Result};
use crate::lint::{Finding, Verdict};
use crate::pipeline::BuildReport;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Sarif,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            "sarif" => Some(Self::Sarif),
            _ => None,
        }
    }
}

/// Render lint findings into the specified format.
pub fn render(
    findings: &[Finding],
    verdict: &Verdict,
    format: OutputFormat,
    recipe_path: &str,
) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(findings, verdict)),
        OutputFormat::Json => json::render(findings, verdict),
        OutputFormat::Sarif => sarif::render(findings, recipe_path),
    }
}

/// Render a build report. SARIF is a findings format; build reports come
/// out as console text or JSON.
pub fn render_build(report: &BuildReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render_build(report)),
        OutputFormat::Json => json::render_build(report),
        OutputFormat::Sarif => Err(KilnError::Config(
            "sarif output covers lint findings only; use console or json".into(),
        )),
    }
}
