use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kiln::config::Config;
use kiln::error::KilnError;
use kiln::lint::{Linter, Severity};
use kiln::output::OutputFormat;
use kiln::pipeline::fetch::FetchedSource;
use kiln::pipeline::{self, BuildOptions};
use kiln::recipe::{self, Recipe};
use kiln::LintOptions;

#[derive(Parser)]
#[command(
    name = "kiln",
    about = "Recipe-driven package builder and linter",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a recipe for schema and integrity defects
    Lint {
        /// Recipe file, or directory containing recipe.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json, sarif)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Minimum severity to fail (info, low, medium, high, critical)
        #[arg(long)]
        fail_on: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Lint a recipe, then fetch, build, and test it
    Build {
        /// Recipe file, or directory containing recipe.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Scratch directory (default: a per-run dir under the system temp dir)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Skip the test stage
        #[arg(long)]
        no_test: bool,

        /// Proceed with url sources that declare no checksum
        #[arg(long)]
        allow_unverified: bool,

        /// Interpreter for import probes
        #[arg(long, default_value = "python")]
        python: String,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Run only a recipe's test suite against an existing source tree
    Test {
        /// Recipe file, or directory containing recipe.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Source tree to test in (default: the recipe directory)
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Interpreter for import probes
        #[arg(long, default_value = "python")]
        python: String,
    },

    /// List all built-in checks
    ListChecks {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter recipe.toml
    Init {
        /// Overwrite existing recipe file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lint {
            path,
            config,
            format,
            fail_on,
            output,
        } => cmd_lint(path, config, format, fail_on, output),
        Commands::Build {
            path,
            config,
            work_dir,
            no_test,
            allow_unverified,
            python,
            format,
            output,
        } => cmd_build(
            path,
            config,
            work_dir,
            no_test,
            allow_unverified,
            python,
            format,
            output,
        ),
        Commands::Test {
            path,
            source_dir,
            python,
        } => cmd_test(path, source_dir, python),
        Commands::ListChecks { format } => cmd_list_checks(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn parse_format(format_str: &str) -> OutputFormat {
    OutputFormat::from_str_lenient(format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    })
}

fn cmd_lint(
    path: PathBuf,
    config: Option<PathBuf>,
    format_str: String,
    fail_on_str: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, KilnError> {
    let format = parse_format(&format_str);

    let fail_on = fail_on_str.and_then(|s| {
        let sev = Severity::from_str_lenient(&s);
        if sev.is_none() {
            eprintln!("Warning: unknown severity '{}', using config default", s);
        }
        sev
    });

    let options = LintOptions {
        config_path: config,
        format,
        fail_on_override: fail_on,
    };

    let report = kiln::lint(&path, &options)?;
    let rendered = kiln::render_lint_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = findings above threshold
    Ok(if report.verdict.pass { 0 } else { 1 })
}

#[allow(clippy::too_many_arguments)]
fn cmd_build(
    path: PathBuf,
    config_path: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    no_test: bool,
    allow_unverified: bool,
    python: String,
    format_str: String,
    output_path: Option<PathBuf>,
) -> Result<i32, KilnError> {
    let format = parse_format(&format_str);

    // Lint gate: a recipe that fails policy does not build.
    let lint_options = LintOptions {
        config_path: config_path.clone(),
        format,
        fail_on_override: None,
    };
    let lint_report = kiln::lint(&path, &lint_options)?;
    if !lint_report.verdict.pass {
        let rendered = kiln::render_lint_report(&lint_report, format)?;
        print!("{}", rendered);
        eprintln!("Recipe failed lint; not building.");
        return Ok(1);
    }

    let recipe_path = recipe::locate(&path);
    let recipe = Recipe::load(&recipe_path)?;
    let recipe_dir = recipe_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let config = match &config_path {
        Some(explicit) => Config::load(explicit)?,
        None => Config::discover(&recipe_dir)?,
    };

    let options = BuildOptions {
        work_dir,
        run_tests: !no_test,
        allow_unverified,
        python,
        fetch: config.fetch,
    };

    let report = pipeline::run(&recipe, &recipe_dir, &options)?;
    let rendered = kiln::output::render_build(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(if report.success { 0 } else { 1 })
}

fn cmd_test(
    path: PathBuf,
    source_dir: Option<PathBuf>,
    python: String,
) -> Result<i32, KilnError> {
    let recipe_path = recipe::locate(&path);
    let recipe = Recipe::load(&recipe_path)?;
    if recipe.test.is_empty() {
        println!("Recipe declares no tests.");
        return Ok(0);
    }

    let recipe_dir = recipe_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let source = FetchedSource {
        src_dir: source_dir.unwrap_or(recipe_dir),
        archive: None,
        verified: false,
    };
    let work_dir = std::env::temp_dir()
        .join("kiln")
        .join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&work_dir)?;

    let options = BuildOptions {
        python,
        ..Default::default()
    };
    match pipeline::test::run_tests(&recipe, &source, &work_dir, &options) {
        Ok(summary) => {
            println!("Tests passed: {}", summary);
            Ok(0)
        }
        Err(e) if e.is_pipeline_failure() => {
            eprintln!("Tests failed: {}", e);
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

fn cmd_list_checks(format_str: String) -> Result<i32, KilnError> {
    let linter = Linter::new();
    let checks = linter.list_checks();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&checks)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<10} {:<20} {:<10} CATEGORY", "ID", "NAME", "SEVERITY");
            println!("{}", "-".repeat(54));
            for check in &checks {
                println!(
                    "{:<10} {:<20} {:<10} {}",
                    check.id,
                    check.name,
                    check.default_severity.to_string(),
                    check.category,
                );
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, KilnError> {
    let path = PathBuf::from(recipe::DEFAULT_FILE_NAME);

    if path.exists() && !force {
        eprintln!("recipe.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Recipe::starter_toml())?;
    println!("Created recipe.toml");

    Ok(0)
}
