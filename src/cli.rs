use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use crate::cache::{ModelSnapshot, SnapshotChange, SnapshotStore};
use crate::config::{CONFIG_FILE_NAME, ConfigOverrides, ProjectConfig};
use crate::pipeline::{self, GenerationReport, GenerationStatus};
use crate::scanner::{ScanError, scan_model};
use crate::version::VERSION;
use napigen_utils::{emit_diagnostic, logger, normalize_line_endings};

/// Message of the error returned after scan diagnostics were printed.
pub const SCAN_FAILED: &str = "scanning failed";

#[derive(Parser, Debug)]
#[command(
    name = "napigen",
    version = VERSION,
    about = "Generates a flat native API and its C++ wrapper from NAPI annotations"
)]
pub struct NapigenCli {
    #[arg(short, long, global = true)]
    /// Log at debug level unless NAPIGEN_LOG is set.
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

impl NapigenCli {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scans the configured headers and writes the flat API, the snapshot and the wrapper header.
    Generate(ProjectArgs),
    /// Scans the given headers and prints the API model as JSON.
    Inspect {
        #[arg(required = true)]
        headers: Vec<PathBuf>,
    },
    /// Exits with 1 when a regeneration would change the stored API snapshot.
    Check(ProjectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    /// Project configuration file.
    pub config: PathBuf,

    #[arg(long)]
    /// Output directory, replacing `out_dir` from the configuration.
    pub out: Option<PathBuf>,

    #[arg(long = "header")]
    /// Declaration file to scan; repeat to scan several, replacing `headers`.
    pub headers: Vec<PathBuf>,

    #[arg(long = "include-class")]
    /// Extra class to include in the wrapper header; replaces `include_classes`.
    pub include_classes: Vec<String>,
}

impl ProjectArgs {
    pub fn load(&self) -> Result<ProjectConfig> {
        Ok(ProjectConfig::load(&self.config)?.with_overrides(ConfigOverrides {
            out_dir: self.out.clone(),
            headers: self.headers.clone(),
            include_classes: self.include_classes.clone(),
        }))
    }
}

/// Parses the command line, runs it, and returns the process exit code.
pub fn run() -> Result<i32> {
    let cli = NapigenCli::parse();
    logger::init_logging(cli.verbose());
    match cli.command() {
        Command::Generate(args) => handle_generate(args),
        Command::Inspect { headers } => handle_inspect(headers),
        Command::Check(args) => handle_check(args),
    }
}

fn handle_generate(args: &ProjectArgs) -> Result<i32> {
    let config = args.load()?;
    let report = pipeline::generate(&config).map_err(report_scan_failure)?;
    print_report(&report);
    Ok(report.status.code())
}

fn handle_inspect(headers: &[PathBuf]) -> Result<i32> {
    let Some(model) = scan_model(headers).map_err(|err| report_scan_failure(err.into()))? else {
        println!("{} no annotated classes found", "empty".yellow().bold());
        return Ok(GenerationStatus::NoModel.code());
    };
    println!("{}", ModelSnapshot::of(&model).to_json()?);
    Ok(0)
}

fn handle_check(args: &ProjectArgs) -> Result<i32> {
    let config = args.load()?;
    let Some(model) =
        scan_model(&config.headers).map_err(|err| report_scan_failure(err.into()))?
    else {
        println!("{} no annotated classes found", "empty".yellow().bold());
        return Ok(GenerationStatus::NoModel.code());
    };

    let store = SnapshotStore::new(&config.out_dir);
    let previous = store
        .lookup()
        .with_context(|| format!("failed to compare against {}", store.path().display()))?;
    let change = SnapshotChange::between(previous.as_ref(), &model);
    debug!(?change, "snapshot compared");

    match &change {
        SnapshotChange::Unchanged => {
            println!("{} {}", "unchanged".green().bold(), model.content_hash());
        }
        SnapshotChange::Created => {
            println!(
                "{} no snapshot at {}",
                "changed".yellow().bold(),
                store.path().display()
            );
        }
        SnapshotChange::Changed { previous } => {
            println!(
                "{} {previous} -> {}",
                "changed".yellow().bold(),
                model.content_hash()
            );
        }
    }

    if let Some(previous) = &previous {
        let diff = previous.class_diff(&model);
        for name in &diff.added {
            println!("  {} {name}", "+".green().bold());
        }
        for name in &diff.removed {
            println!("  {} {name}", "-".red().bold());
        }
    }
    Ok(i32::from(change.is_changed()))
}

fn print_report(report: &GenerationReport) {
    match report.status {
        GenerationStatus::NoModel => {
            println!("{} couldn't get the native api", "skipped".yellow().bold());
            return;
        }
        GenerationStatus::WrapperFailed => {
            println!("{} wrapper header not generated", "failed".red().bold());
        }
        GenerationStatus::Success => {}
    }

    if let Some(model) = &report.model {
        println!(
            "{} {} classes, {} functions ({})",
            "scanned".bold(),
            model.classes().len(),
            model.function_count(),
            model.content_hash()
        );
    }
    for path in [&report.flat_api, &report.shared_header, &report.wrapper_header]
        .into_iter()
        .flatten()
    {
        println!("{} {}", "generated".green().bold(), path.display());
    }
}

/// Renders a scan error against its declaration file and replaces it with
/// [`SCAN_FAILED`]. Other errors pass through.
fn report_scan_failure(err: anyhow::Error) -> anyhow::Error {
    let located = err.downcast_ref::<ScanError>().and_then(|scan_error| {
        Some((scan_error.to_diagnostic()?, scan_error.source_id()?.to_string()))
    });
    let Some((diagnostic, source_id)) = located else {
        return err;
    };
    let Ok(source) = fs::read_to_string(&source_id) else {
        return err;
    };

    emit_diagnostic(&diagnostic, &normalize_line_endings(&source));
    anyhow!(SCAN_FAILED)
}
