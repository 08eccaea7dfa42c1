//! The build pipeline.
//!
//! A run walks a recipe through three stages in order: fetch (acquire and
//! verify the source), build (run the install script), test (import probes
//! and test commands). Stage failures are outcomes, recorded in the
//! [`BuildReport`]; only tool malfunctions surface as `Err`.

pub mod fetch;
pub mod script;
pub mod test;

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::FetchSettings;
use crate::error::Result;
use crate::platform::Platform;
use crate::recipe::Recipe;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetch,
    Build,
    Test,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Build => "build",
            Self::Test => "test",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Passed,
    Failed,
    Skipped,
}

/// One stage's outcome.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    /// What happened, for humans ("verified archive", "exit status 2").
    pub detail: String,
    pub duration_ms: u64,
}

/// The full record of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub run_id: Uuid,
    pub package: String,
    pub version: String,
    pub platform: Option<Platform>,
    /// True when build.skip named the current platform and nothing ran.
    pub skipped: bool,
    pub stages: Vec<StageReport>,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Scratch directory; a per-run directory under the system temp dir
    /// when unset.
    pub work_dir: Option<PathBuf>,
    pub run_tests: bool,
    /// Proceed with url sources that declare no checksum.
    pub allow_unverified: bool,
    /// Interpreter used for import probes.
    pub python: String,
    pub fetch: FetchSettings,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            work_dir: None,
            run_tests: true,
            allow_unverified: false,
            python: "python".into(),
            fetch: FetchSettings::default(),
        }
    }
}

/// Run the pipeline for `recipe`. Relative source paths resolve against
/// `recipe_dir`.
pub fn run(recipe: &Recipe, recipe_dir: &Path, options: &BuildOptions) -> Result<BuildReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let platform = Platform::current();

    let mut report = BuildReport {
        run_id,
        package: recipe.package.name.clone(),
        version: recipe.package.version.clone(),
        platform,
        skipped: false,
        stages: Vec::new(),
        success: false,
        started_at,
        finished_at: started_at,
    };

    if let Some(platform) = platform {
        if recipe.build.skips(platform) {
            info!(%platform, package = %report.package, "recipe skips this platform");
            report.skipped = true;
            report.success = true;
            report.finished_at = Utc::now();
            return Ok(report);
        }
    }

    let work_dir = match &options.work_dir {
        Some(dir) => dir.clone(),
        None => std::env::temp_dir().join("kiln").join(run_id.to_string()),
    };
    std::fs::create_dir_all(&work_dir)?;
    info!(run_id = %run_id, work_dir = %work_dir.display(), "starting pipeline");

    let outcome = run_stages(recipe, recipe_dir, &work_dir, options, &mut report);
    report.finished_at = Utc::now();
    match outcome {
        Ok(()) => {
            report.success = true;
            Ok(report)
        }
        Err(e) if e.is_pipeline_failure() => Ok(report),
        Err(e) => Err(e),
    }
}

fn run_stages(
    recipe: &Recipe,
    recipe_dir: &Path,
    work_dir: &Path,
    options: &BuildOptions,
    report: &mut BuildReport,
) -> Result<()> {
    let source = run_stage(report, Stage::Fetch, || {
        let fetched = fetch::fetch(recipe, recipe_dir, work_dir, options)?;
        let detail = fetched.describe();
        Ok((fetched, detail))
    })?;

    run_stage(report, Stage::Build, || {
        script::run_build(recipe, &source)?;
        Ok(((), "build script succeeded".into()))
    })?;

    let skip_reason = if !options.run_tests {
        Some("tests disabled")
    } else if recipe.test.is_empty() {
        Some("recipe declares no tests")
    } else {
        None
    };
    if let Some(reason) = skip_reason {
        report.stages.push(StageReport {
            stage: Stage::Test,
            status: StageStatus::Skipped,
            detail: reason.into(),
            duration_ms: 0,
        });
        return Ok(());
    }
    run_stage(report, Stage::Test, || {
        let summary = test::run_tests(recipe, &source, work_dir, options)?;
        Ok(((), summary))
    })?;
    Ok(())
}

/// Time one stage and record its outcome. Errors still propagate so later
/// stages do not run.
fn run_stage<T>(
    report: &mut BuildReport,
    stage: Stage,
    body: impl FnOnce() -> Result<(T, String)>,
) -> Result<T> {
    let start = Instant::now();
    let outcome = body();
    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok((value, detail)) => {
            info!(%stage, detail = %detail, "stage passed");
            report.stages.push(StageReport {
                stage,
                status: StageStatus::Passed,
                detail,
                duration_ms,
            });
            Ok(value)
        }
        Err(e) => {
            report.stages.push(StageReport {
                stage,
                status: StageStatus::Failed,
                detail: e.to_string(),
                duration_ms,
            });
            Err(e)
        }
    }
}
