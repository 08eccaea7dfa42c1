//! Build script execution.
//!
//! Scripts are one-liners run through the platform shell with the staged
//! source as the working directory. The recipe's identity and the staged
//! paths are exported as `KILN_*` variables so scripts can stay generic.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{KilnError, Result};
use crate::pipeline::fetch::FetchedSource;
use crate::recipe::Recipe;

#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");
#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");

/// A shell command wired up with the run's environment contract.
pub(crate) fn command(line: &str, cwd: &Path, source: &FetchedSource, recipe: &Recipe) -> Command {
    let (shell, flag) = SHELL;
    let mut cmd = Command::new(shell);
    cmd.arg(flag)
        .arg(line)
        .current_dir(cwd)
        .env("KILN_SRC_DIR", &source.src_dir)
        .env("KILN_PKG_NAME", &recipe.package.name)
        .env("KILN_PKG_VERSION", &recipe.package.version)
        .env("KILN_BUILD_NUMBER", recipe.build.number.to_string());
    if let Some(archive) = &source.archive {
        cmd.env("KILN_SRC_ARCHIVE", archive);
    }
    cmd
}

/// Run `build.script` in the staged source directory.
pub fn run_build(recipe: &Recipe, source: &FetchedSource) -> Result<()> {
    if recipe.build.script_is_empty() {
        return Err(KilnError::Config("build.script is empty".into()));
    }
    let line = recipe.build.script.trim();
    info!(script = line, "running build script");
    let status = command(line, &source.src_dir, source, recipe).status()?;
    if !status.success() {
        return Err(KilnError::Build {
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn fixture(script: &str) -> (tempfile::TempDir, Recipe, FetchedSource) {
        let dir = tempfile::tempdir().unwrap();
        let recipe = Recipe::from_str(&format!(
            "[package]\nname = \"demo\"\nversion = \"1.0\"\n\n[build]\nscript = \"{script}\"\nnumber = 2\n",
        ))
        .unwrap();
        let source = FetchedSource {
            src_dir: dir.path().to_path_buf(),
            archive: None,
            verified: false,
        };
        (dir, recipe, source)
    }

    #[test]
    fn successful_script_is_ok() {
        let (_dir, recipe, source) = fixture("true");
        run_build(&recipe, &source).unwrap();
    }

    #[test]
    fn exit_status_is_reported() {
        let (_dir, recipe, source) = fixture("exit 7");
        match run_build(&recipe, &source).unwrap_err() {
            KilnError::Build { status } => assert_eq!(status, 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_script_is_a_config_error() {
        let (_dir, recipe, source) = fixture("  ");
        assert!(matches!(
            run_build(&recipe, &source).unwrap_err(),
            KilnError::Config(_)
        ));
    }

    #[test]
    fn environment_contract_is_exported() {
        let (dir, recipe, source) =
            fixture("printf %s $KILN_PKG_NAME-$KILN_PKG_VERSION-$KILN_BUILD_NUMBER > out.txt");
        run_build(&recipe, &source).unwrap();
        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "demo-1.0-2");
    }
}
