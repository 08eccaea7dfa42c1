//! The test stage: import probes, then test commands.
//!
//! When the recipe lists `test.source_files`, the matching files are copied
//! out of the staged source into a clean `test/` directory and everything
//! runs there; installed-package tests must not pass just because the
//! source tree is on the path. Without `source_files` tests run in the
//! source directory itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{KilnError, Result};
use crate::pipeline::fetch::FetchedSource;
use crate::pipeline::{script, BuildOptions};
use crate::recipe::Recipe;

pub fn run_tests(
    recipe: &Recipe,
    source: &FetchedSource,
    work_dir: &Path,
    options: &BuildOptions,
) -> Result<String> {
    let test_dir = if recipe.test.source_files.is_empty() {
        source.src_dir.clone()
    } else {
        let dir = work_dir.join("test");
        fs::create_dir_all(&dir)?;
        let staged = stage_test_files(recipe, source, &dir)?;
        info!(staged, "staged test files");
        dir
    };

    let mut probes = 0usize;
    for module in &recipe.test.imports {
        let module = module.trim();
        if module.is_empty() {
            continue;
        }
        info!(module, interpreter = %options.python, "import probe");
        let status = Command::new(&options.python)
            .arg("-c")
            .arg(format!("import {module}"))
            .current_dir(&test_dir)
            .status()?;
        if !status.success() {
            return Err(KilnError::Import {
                module: module.to_string(),
            });
        }
        probes += 1;
    }

    let mut commands = 0usize;
    for line in &recipe.test.commands {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        info!(command = line, "test command");
        let status = script::command(line, &test_dir, source, recipe).status()?;
        if !status.success() {
            return Err(KilnError::TestCommand {
                command: line.to_string(),
                status: status.code().unwrap_or(-1),
            });
        }
        commands += 1;
    }

    Ok(format!("{probes} import probes, {commands} commands"))
}

/// Copy files matching `test.source_files` globs from the staged source
/// into `test_dir`, preserving relative paths.
fn stage_test_files(recipe: &Recipe, source: &FetchedSource, test_dir: &Path) -> Result<usize> {
    let mut patterns = Vec::new();
    for raw in &recipe.test.source_files {
        let pattern = glob::Pattern::new(raw)
            .map_err(|e| KilnError::Config(format!("invalid test.source_files glob `{raw}`: {e}")))?;
        patterns.push(pattern);
    }

    let mut staged = 0usize;
    for entry in walkdir::WalkDir::new(&source.src_dir) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&source.src_dir) else {
            continue;
        };
        if !patterns.iter().any(|p| p.matches_path(rel)) {
            continue;
        }
        let dest: PathBuf = test_dir.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)?;
        staged += 1;
    }
    Ok(staged)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn source_in(dir: &Path) -> FetchedSource {
        FetchedSource {
            src_dir: dir.to_path_buf(),
            archive: None,
            verified: false,
        }
    }

    #[test]
    fn passing_commands_are_summarized() {
        let src = tempfile::tempdir().unwrap();
        let recipe =
            Recipe::from_str("[test]\ncommands = [\"true\", \"echo ok\"]\n").unwrap();
        let summary = run_tests(
            &recipe,
            &source_in(src.path()),
            src.path(),
            &BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(summary, "0 import probes, 2 commands");
    }

    #[test]
    fn failing_command_reports_its_status() {
        let src = tempfile::tempdir().unwrap();
        let recipe = Recipe::from_str("[test]\ncommands = [\"exit 4\"]\n").unwrap();
        let err = run_tests(
            &recipe,
            &source_in(src.path()),
            src.path(),
            &BuildOptions::default(),
        )
        .unwrap_err();
        match err {
            KilnError::TestCommand { command, status } => {
                assert_eq!(command, "exit 4");
                assert_eq!(status, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failed_import_names_the_module() {
        let src = tempfile::tempdir().unwrap();
        let recipe = Recipe::from_str("[test]\nimports = [\"plots\"]\n").unwrap();
        let mut options = BuildOptions::default();
        // `false` ignores its arguments and exits 1, standing in for a
        // python whose import fails.
        options.python = "false".into();
        let err = run_tests(&recipe, &source_in(src.path()), src.path(), &options).unwrap_err();
        assert!(matches!(err, KilnError::Import { module } if module == "plots"));
    }

    #[test]
    fn source_files_are_staged_into_a_clean_dir() {
        let src = tempfile::tempdir().unwrap();
        fs::create_dir(src.path().join("tests")).unwrap();
        fs::write(src.path().join("tests/test_smoke.py"), "# stub\n").unwrap();
        fs::write(src.path().join("setup.py"), "# stub\n").unwrap();

        let work = tempfile::tempdir().unwrap();
        let recipe = Recipe::from_str(
            "[test]\nsource_files = [\"tests/*\"]\ncommands = [\"test -f tests/test_smoke.py\", \"test ! -f setup.py\"]\n",
        )
        .unwrap();
        run_tests(
            &recipe,
            &source_in(src.path()),
            work.path(),
            &BuildOptions::default(),
        )
        .unwrap();
        assert!(work.path().join("test/tests/test_smoke.py").is_file());
    }

    #[test]
    fn bad_glob_is_a_config_error() {
        let src = tempfile::tempdir().unwrap();
        let recipe =
            Recipe::from_str("[test]\nsource_files = [\"[\"]\ncommands = [\"true\"]\n").unwrap();
        let err = run_tests(
            &recipe,
            &source_in(src.path()),
            src.path(),
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, KilnError::Config(_)));
    }
}
