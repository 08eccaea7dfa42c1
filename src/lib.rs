//! Recipe-driven package builds.
//!
//! kiln parses declarative `recipe.toml` files, lints them with a suite of
//! schema and integrity checks, and drives the fetch, build, test pipeline
//! for recipes that pass. Output comes out as console text, JSON, or SARIF.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use kiln::{lint, LintOptions};
//!
//! let options = LintOptions::default();
//! let report = lint(Path::new("./recipes/am-radiation-scripts"), &options).unwrap();
//! println!("Pass: {}, Findings: {}", report.verdict.pass, report.findings.len());
//! ```

pub mod config;
pub mod error;
pub mod lint;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod recipe;

use std::path::Path;

use config::Config;
use error::Result;
use lint::{Finding, Linter, Severity, Verdict};
use output::OutputFormat;
use recipe::Recipe;

/// Options for a lint invocation.
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Path to config file (defaults to `kiln.toml` next to the recipe).
    pub config_path: Option<std::path::PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// CLI override for fail_on threshold.
    pub fail_on_override: Option<Severity>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            format: OutputFormat::Console,
            fail_on_override: None,
        }
    }
}

/// Complete lint report.
#[derive(Debug)]
pub struct LintReport {
    pub recipe_path: String,
    pub package: String,
    pub version: String,
    pub findings: Vec<Finding>,
    pub verdict: Verdict,
}

/// Run a complete lint: locate and parse the recipe, run every check,
/// evaluate the policy.
pub fn lint(path: &Path, options: &LintOptions) -> Result<LintReport> {
    let recipe_path = recipe::locate(path);
    let recipe = Recipe::load(&recipe_path)?;

    let recipe_dir = recipe_path.parent().unwrap_or_else(|| Path::new("."));
    let mut config = match &options.config_path {
        Some(explicit) => Config::load(explicit)?,
        None => Config::discover(recipe_dir)?,
    };

    // Apply CLI override
    if let Some(fail_on) = options.fail_on_override {
        config.policy.fail_on = fail_on;
    }

    let linter = Linter::new();
    let all_findings = linter.run(&recipe);

    // Apply policy (ignored checks, severity overrides)
    let effective_findings = config.policy.apply(&all_findings);
    let verdict = config.policy.evaluate(&all_findings);

    Ok(LintReport {
        recipe_path: recipe_path.display().to_string(),
        package: recipe.package.name.clone(),
        version: recipe.package.version.clone(),
        findings: effective_findings,
        verdict,
    })
}

/// Render a lint report in the specified format.
pub fn render_lint_report(report: &LintReport, format: OutputFormat) -> Result<String> {
    output::render(
        &report.findings,
        &report.verdict,
        format,
        &report.recipe_path,
    )
}
