use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use gradschool_tools::audit::AuditConfig;
use gradschool_tools::layout::MergeLayout;
use gradschool_tools::logging::{self, LogConfig};
use gradschool_tools::{Result, run};
use tracing::{error, info};

/// Maximum number of audit issues printed to stdout.
const MAX_PRINTED_ISSUES: usize = 50;

fn main() {
    let cli = Cli::parse();
    let log_config =
        LogConfig::from_verbosity(cli.verbose, cli.quiet).with_log_file(cli.log_file.clone());
    if let Err(error) = logging::init_logging(&log_config) {
        eprintln!("warning: {error}");
    }

    let outcome = execute(cli.command);
    if let Err(error) = &outcome {
        error!(%error, detail = ?error, "run failed");
        eprintln!("error: {error}");
    }
    info!("run completed");

    if outcome.is_err() {
        std::process::exit(1);
    }
}

fn execute(command: Command) -> Result<()> {
    match command {
        Command::Merge(args) => execute_merge(args),
        Command::Audit(args) => execute_audit(args),
    }
}

fn execute_merge(args: MergeArgs) -> Result<()> {
    let layout = match &args.layout {
        Some(path) => MergeLayout::from_path(path)?,
        None => MergeLayout::cas(),
    };

    let output = run::merge_file(&args.input, args.output_dir.as_deref(), &layout)?;
    println!("Merged data saved to: {}", output.display());
    Ok(())
}

fn execute_audit(args: AuditArgs) -> Result<()> {
    let config = AuditConfig {
        review_sheet: args.review_sheet,
        final_sheet: args.final_sheet,
        review_row_limit: args.limit,
    };
    let report = run::audit_file(&args.input, &config)?;

    println!("=== AUDIT SUMMARY ===");
    println!(
        "Review rows with decisions: {}",
        report.publishable + report.ignored
    );
    println!("  Publishable: {}", report.publishable);
    println!("  Ignore: {}", report.ignored);
    println!("  Blank decision (skipped): {}", report.blank_decisions);
    println!("Final table unique pairs: {}", report.final_pairs);

    if report.is_clean() {
        println!("=== NO ISSUES: decisions accurately reflected in the final table ===");
        return Ok(());
    }

    println!("=== ISSUES FOUND: {} ===", report.issues.len());
    for issue in report.issues.iter().take(MAX_PRINTED_ISSUES) {
        println!("{issue}");
    }
    if report.issues.len() > MAX_PRINTED_ISSUES {
        println!("... and {} more", report.issues.len() - MAX_PRINTED_ISSUES);
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge and audit graduate-school program workbooks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors to stderr (the log file still records info events).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Append logs to this file as well as stderr.
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the program tabs of a workbook into one text-only sheet.
    Merge(MergeArgs),
    /// Check review decisions against the final translation table.
    Audit(AuditArgs),
}

#[derive(clap::Args)]
struct MergeArgs {
    /// Workbook to merge.
    input: PathBuf,

    /// JSON sheet layout replacing the built-in program layout.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Directory for the merged workbook (defaults to the input's directory).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
struct AuditArgs {
    /// Workbook holding both the review and final sheets.
    input: PathBuf,

    /// Sheet with one decision per row.
    #[arg(long, default_value = gradschool_tools::audit::REVIEW_SHEET)]
    review_sheet: String,

    /// Sheet with the published translation pairs.
    #[arg(long, default_value = gradschool_tools::audit::FINAL_SHEET)]
    final_sheet: String,

    /// Audit only the first N review rows.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}
