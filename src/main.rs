//! sheet-diff: key-based diff of tabular datasets
//!
//! Compares two workbooks, CSV files or JSON datasets record by record.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sheet_diff::{
    cli,
    config::{AppConfig, ConfigPreset, DiffConfig, DiffPaths, Validatable, CONFIG_FILE_NAMES},
    matching::{DuplicatePolicy, FallbackStrategy},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nInput Formats:",
        "\n  JSON datasets, CSV/TSV files, directories of CSV files",
        "\n  Workbooks: xlsx, xlsm, xlsb, xls, ods (feature \"xlsx\")",
        "\n\nOutput Formats:",
        "\n  summary, json, markdown, csv"
    )
}

#[derive(Parser)]
#[command(name = "sheet-diff")]
#[command(version, long_version = build_long_version())]
#[command(about = "Key-based diff of spreadsheets and tabular datasets", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success (differences are only fatal with --fail-on-diff)
    1  Differences found with --fail-on-diff
    2  One or more sheets could not be compared
    3  Error occurred

EXAMPLES:
    # Compare two workbooks sheet by sheet
    sheet-diff diff client.xlsx it.xlsx

    # Custom identifier columns, JSON report
    sheet-diff diff a.csv b.csv -i \"Order ID,Line\" -o json > diff.json

    # CI check with one CSV per report table
    sheet-diff diff a.xlsx b.xlsx --fail-on-diff --output-dir report/")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SHEET_DIFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to dataset A (the reference)
    a: PathBuf,

    /// Path to dataset B
    b: PathBuf,

    /// Comma-separated identifier columns, in key order
    #[arg(short, long, value_delimiter = ',')]
    identifiers: Option<Vec<String>>,

    /// Named preset (default, strict, lenient, ci) used instead of a discovered config file
    #[arg(long)]
    preset: Option<String>,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Also write one CSV file per report table into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Only compare these sheets (repeatable)
    #[arg(long = "sheet", value_name = "NAME")]
    sheets: Vec<String>,

    /// Absolute numeric tolerance
    #[arg(long)]
    abs_tolerance: Option<f64>,

    /// Relative numeric tolerance
    #[arg(long)]
    rel_tolerance: Option<f64>,

    /// Row kept when a key repeats within one sheet
    #[arg(long, value_enum)]
    duplicate_policy: Option<DuplicatePolicy>,

    /// Keying strategy when no identifier column is shared
    #[arg(long, value_enum)]
    fallback: Option<FallbackStrategy>,

    /// Leave identical records out of the per-sheet detail tables
    #[arg(long)]
    no_identical: bool,

    /// Compare on a single thread
    #[arg(long)]
    no_parallel: bool,

    /// Hide the progress line
    #[arg(long)]
    no_progress: bool,

    /// Exit with code 1 if any difference is found
    #[arg(long)]
    fail_on_diff: bool,
}

/// Arguments for the `sheets` subcommand
#[derive(Parser)]
struct SheetsArgs {
    /// Path to the dataset
    path: PathBuf,

    /// Comma-separated identifier columns to look for
    #[arg(short, long, value_delimiter = ',')]
    identifiers: Option<Vec<String>>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two datasets
    Diff(DiffArgs),

    /// List the sheets of a dataset and the identifiers they carry
    Sheets(SheetsArgs),

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sheet-diff.yaml in the current directory
    Init,
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Load the config file (if any) and fail on invalid values.
fn load_app_config(explicit: Option<&std::path::Path>, preset: Option<&str>) -> Result<AppConfig> {
    let base = match preset {
        Some(name) => {
            let preset = ConfigPreset::from_name(name).with_context(|| {
                let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
            })?;
            Some(AppConfig::from_preset(preset))
        }
        None => None,
    };

    let config = match (explicit, base) {
        (Some(path), _) => sheet_diff::config::load_config_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        (None, Some(base)) => base,
        (None, None) => sheet_diff::config::load_or_default(None).0,
    };
    Ok(config)
}

/// Apply command-line overrides on top of file settings.
fn apply_diff_args(config: &mut AppConfig, args: &DiffArgs, cli: &Cli) {
    if let Some(ids) = &args.identifiers {
        config.identifiers.columns.clone_from(ids);
    }
    if let Some(format) = args.output {
        config.output.format = format;
    }
    if args.output_file.is_some() {
        config.output.file.clone_from(&args.output_file);
    }
    if args.output_dir.is_some() {
        config.output.directory.clone_from(&args.output_dir);
    }
    if !args.sheets.is_empty() {
        config.comparison.sheets.clone_from(&args.sheets);
    }
    if let Some(abs) = args.abs_tolerance {
        config.comparison.abs_tolerance = abs;
    }
    if let Some(rel) = args.rel_tolerance {
        config.comparison.rel_tolerance = rel;
    }
    if let Some(policy) = args.duplicate_policy {
        config.comparison.duplicate_policy = policy;
    }
    if let Some(fallback) = args.fallback {
        config.comparison.fallback = fallback;
    }
    if args.no_identical {
        config.output.include_identical = false;
    }
    if args.no_parallel {
        config.comparison.parallel = false;
    }
    if args.no_progress {
        config.behavior.no_progress = true;
    }
    if args.fail_on_diff {
        config.behavior.fail_on_diff = true;
    }
    if cli.no_color {
        config.output.no_color = true;
    }
    if cli.quiet {
        config.behavior.quiet = true;
    }
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Diff(args) => {
            let mut app = load_app_config(cli.config.as_deref(), args.preset.as_deref())?;
            apply_diff_args(&mut app, args, &cli);

            let errors = app.validate();
            if !errors.is_empty() {
                for error in &errors {
                    tracing::error!("Invalid configuration: {error}");
                }
                anyhow::bail!("{} configuration error(s)", errors.len());
            }

            let paths = DiffPaths {
                a: args.a.clone(),
                b: args.b.clone(),
            };
            let config = DiffConfig::from_app(paths, app)?;
            cli::run_diff(config)
        }

        Commands::Sheets(args) => {
            let mut app = load_app_config(cli.config.as_deref(), None)?;
            if let Some(ids) = &args.identifiers {
                app.identifiers.columns.clone_from(ids);
            }
            let identifiers = app.identifiers.spec()?;
            cli::run_sheets(&args.path, &identifiers, args.json, cli.quiet)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let (config, loaded_from) =
                        sheet_diff::config::load_or_default(cli.config.as_deref());
                    if let Some(path) = &loaded_from {
                        eprintln!("# Loaded from: {}", path.display());
                    } else {
                        eprintln!("# No config file found; showing defaults");
                    }
                    let yaml = sheet_diff::config::file::to_yaml(&config)
                        .context("failed to serialize config")?;
                    print!("{yaml}");
                }
                ConfigAction::Path => {
                    let cwd = std::env::current_dir().ok();
                    let search_paths = [
                        cwd.as_ref().map(|p| p.display().to_string()),
                        cwd.as_ref().map(|_| "<git repository root>".to_string()),
                        dirs::config_dir().map(|p| p.join("sheet-diff").display().to_string()),
                        dirs::home_dir().map(|p| p.display().to_string()),
                    ];
                    eprintln!("Config file search paths (in order):");
                    for path in search_paths.into_iter().flatten() {
                        eprintln!("  {path}");
                    }
                    eprintln!();
                    eprintln!("Recognized file names:");
                    for name in CONFIG_FILE_NAMES {
                        eprintln!("  {name}");
                    }
                    eprintln!();
                    match sheet_diff::config::discover_config_file(cli.config.as_deref()) {
                        Some(path) => eprintln!("Active config file: {}", path.display()),
                        None => eprintln!("No config file found."),
                    }
                }
                ConfigAction::Init => {
                    let target = std::env::current_dir()
                        .context("cannot determine current directory")?
                        .join(".sheet-diff.yaml");
                    if target.exists() {
                        anyhow::bail!(
                            "{} already exists. Remove it first to re-initialize.",
                            target.display()
                        );
                    }
                    let content = sheet_diff::config::generate_full_example_config();
                    std::fs::write(&target, content)
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    eprintln!("Created {}", target.display());
                }
                ConfigAction::Schema { output } => {
                    let schema = sheet_diff::config::generate_json_schema()
                        .context("failed to serialize schema")?;
                    match output {
                        Some(path) => {
                            std::fs::write(path, &schema)
                                .with_context(|| format!("failed to write {}", path.display()))?;
                            eprintln!("Schema written to {}", path.display());
                        }
                        None => println!("{schema}"),
                    }
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "sheet-diff", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_codes::ERROR
        }
    };
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
}
