//! CLI entry point for cleaning the air-quality dataset.

use airq_processing::{
    Cleaner, CleaningConfig, LoaderOptions, MissingColumnPolicy, NormalizationReport,
    load_dataset, missing_percentages, save_dataset,
};
use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Replace missing-value sentinels in the UCI air-quality dataset",
    long_about = "Reads the semicolon-delimited UCI air-quality file, rewrites every spelling of \
                  the -200 missing-value code (-200, -200.0, -200,0) to NaN in the numeric \
                  columns, converts them to numbers and assembles a DateTime column.\n\n\
                  EXAMPLES:\n  \
                  # Clean and write CSV\n  \
                  airq-clean -i AirQualityUCI.csv -o cleaned.csv\n\n  \
                  # Only a few columns, tolerate absent ones\n  \
                  airq-clean -i data.csv --columns 'CO(GT),T,RH' --skip-missing-columns\n\n  \
                  # Machine-readable report\n  \
                  airq-clean -i data.csv --json | jq .report.columns"
)]
struct Args {
    /// Path to the delimited input file
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the cleaned dataset (.csv or .parquet)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma-separated numeric columns to normalize
    ///
    /// Defaults to the 13 UCI measurement columns
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Field separator of the input (and CSV output)
    #[arg(long, default_value = ";")]
    separator: char,

    /// Additional raw form to treat as missing (repeatable)
    #[arg(long = "extra-sentinel", value_name = "FORM", allow_hyphen_values = true)]
    extra_sentinels: Vec<String>,

    /// Skip requested columns that are absent instead of failing
    #[arg(long)]
    skip_missing_columns: bool,

    /// Parse text numbers with '.' as decimal mark and ',' as thousands separator
    #[arg(long)]
    dot_decimal: bool,

    /// Do not assemble the DateTime column
    #[arg(long)]
    no_timestamps: bool,

    /// Read ambiguous dates as MM/DD/YYYY
    #[arg(long)]
    month_first: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs so stdout holds only the JSON document.
    #[arg(long)]
    json: bool,
}

/// JSON document printed with `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    report: &'a NormalizationReport,
    missing: Vec<airq_processing::ColumnMissing>,
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
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if let Err(e) = run(&args) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = build_config(args)?;
    let loader_options = LoaderOptions {
        separator: args.separator,
        ..Default::default()
    };

    let data = load_dataset(&args.input, &loader_options)?;
    let result = Cleaner::new(config)?.clean(data)?;
    let mut cleaned = result.data;

    if let Some(ref output) = args.output {
        save_dataset(&mut cleaned, output, args.separator)?;
    }

    let missing = missing_percentages(&cleaned)?;

    if args.json {
        let input = args.input.to_string_lossy();
        let doc = JsonOutput {
            input: &input,
            output: args.output.as_ref().map(|p| p.display().to_string()),
            report: &result.report,
            missing,
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print_summary(args, &result.report, &missing);
    }

    info!("Done");
    Ok(())
}

fn build_config(args: &Args) -> Result<CleaningConfig> {
    let mut builder = CleaningConfig::builder()
        .decimal_comma(!args.dot_decimal)
        .assemble_timestamps(!args.no_timestamps)
        .day_first(!args.month_first)
        .missing_column_policy(if args.skip_missing_columns {
            MissingColumnPolicy::Skip
        } else {
            MissingColumnPolicy::Abort
        });

    if let Some(ref columns) = args.columns {
        builder = builder.numeric_columns(columns.iter().map(|c| c.trim().to_string()));
    }

    for form in &args.extra_sentinels {
        builder = builder.extra_sentinel(form);
    }

    Ok(builder.build()?)
}

/// Human-readable summary.
///
/// Uses `println!` intentionally: this is the primary output of the command
/// and must be visible regardless of log level.
fn print_summary(
    args: &Args,
    report: &NormalizationReport,
    missing: &[airq_processing::ColumnMissing],
) {
    println!("\n{}", "=".repeat(80));
    println!("SENTINEL NORMALIZATION");
    println!("{}\n", "=".repeat(80));

    println!("  File: {}", args.input.display());
    println!("  Rows: {}", report.rows);
    println!("  Duration: {}ms", report.duration_ms);
    println!();

    println!(
        "{:<16} {:<8} {:>10} {:>12} {:>10} {:>10}",
        "Column", "Type", "Sentinels", "Unparseable", "Missing", "Missing %"
    );
    println!("{}", "-".repeat(72));

    for column in &report.columns {
        println!(
            "{:<16} {:<8} {:>10} {:>12} {:>10} {:>10.2}",
            truncate_str(&column.column, 15),
            column.original_dtype,
            column.sentinels_replaced,
            column.unparseable,
            column.missing_after(),
            column.missing_percentage()
        );
    }
    println!();

    if !report.skipped_columns.is_empty() {
        println!("  Skipped (not in dataset): {}", report.skipped_columns.join(", "));
    }

    if let Some(parsed) = report.timestamps_parsed {
        println!("  Timestamps assembled: {} of {}", parsed, report.rows);
    }

    let other: Vec<_> = missing
        .iter()
        .filter(|m| m.missing > 0 && report.column(&m.column).is_none())
        .collect();
    if !other.is_empty() {
        println!("  Missing values in other columns:");
        for m in other {
            println!("    {:<16} {:>6.2}%", truncate_str(&m.column, 15), m.percentage);
        }
    }

    if let Some(ref output) = args.output {
        println!("  Cleaned data written to: {}", output.display());
    }

    println!(
        "\n  Total: {} sentinel value(s), {} unparseable value(s) set to NaN",
        report.total_sentinels_replaced(),
        report.total_unparseable()
    );
    println!("{}", "=".repeat(80));
}

fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
