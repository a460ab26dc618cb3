//! CLI entry point for the file health check.

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use dotenv::dotenv;
use file_health::{
    DiagnosticEngine, HealthCheckConfig, ReportGenerator, TableSource, render_text,
};
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data-quality health check for CSV files",
    long_about = "Reports completeness, duplicate rows, missing values, descriptive \
                  statistics and outliers of a CSV file or a shared spreadsheet.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  FILE_HEALTH_MAX_SIZE_MB    Input size ceiling in MiB (default 200)\n\n\
                  EXAMPLES:\n  \
                  # Check a local file\n  \
                  file-health -i data.csv\n\n  \
                  # Inspect outliers of one column\n  \
                  file-health -i data.csv --column price\n\n  \
                  # Check a shared spreadsheet and save the report\n  \
                  file-health --url https://docs.google.com/spreadsheets/d/<id>/edit --emit-report",
    group(ArgGroup::new("source").required(true).args(["input", "url"]))
)]
struct Args {
    /// Path to the CSV file to check
    #[arg(short, long)]
    input: Option<String>,

    /// Shared spreadsheet link (its "/edit" URL)
    #[arg(short, long)]
    url: Option<String>,

    /// Numeric column whose outliers are listed
    ///
    /// Defaults to the first numeric column that has values
    #[arg(short, long)]
    column: Option<String>,

    /// Maximum input size in MiB
    #[arg(long, env = "FILE_HEALTH_MAX_SIZE_MB", default_value = "200")]
    max_size_mb: u64,

    /// Number of histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Output directory for reports
    #[arg(short, long, default_value = "./output")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // .env must be loaded before parsing so env-backed flags see it
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let mut builder = HealthCheckConfig::builder()
        .max_input_mib(args.max_size_mb)
        .output_dir(&args.output);
    if let Some(bins) = args.bins {
        builder = builder.histogram_bins(bins);
    }
    let config = builder.build()?;

    let source = match (&args.input, &args.url) {
        (Some(path), _) => TableSource::local(path),
        (None, Some(url)) => TableSource::remote(url),
        (None, None) => bail!("Either --input or --url is required"),
    };

    info!("Loading {}", source.label());
    let loaded = source
        .load(&config)
        .with_context(|| format!("Could not load {}", source.label()))?;

    let started = Instant::now();
    let engine = DiagnosticEngine::new(config.clone());
    let diagnosis = engine.run(&loaded.table, args.column.as_deref())?;
    let report = ReportGenerator::build(&loaded, diagnosis, started.elapsed());

    // Written before any output mode so `--json --emit-report` does both
    if args.emit_report {
        let generator = ReportGenerator::new(&config.output_dir);
        let report_path = generator.write_report_to_file(&report, &report_base_name(&args))?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", render_text(&report));
    if !args.quiet {
        println!("Use --json for machine-readable output");
        println!("Use --emit-report to save the JSON report");
    }

    Ok(())
}

/// Base name of the written report: the input file stem, or "spreadsheet"
/// for remote sources.
fn report_base_name(args: &Args) -> String {
    args.input
        .as_deref()
        .and_then(|path| Path::new(path).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("spreadsheet")
        .to_string()
}
