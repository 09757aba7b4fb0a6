//! budget-fx CLI - convert budget amounts in a CSV file from EUR to local currencies
//!
//! ## Example Usage
//!
//! ```bash
//! budget-fx budgets.csv budgets_local.csv
//! budget-fx budgets.csv out.csv --chunk-size 5000 --config fx.toml
//! ```
//!
//! Progress and failures go to a per-run file under the logs directory. The
//! process exits 0 once a run has started, even if steps logged errors.

use budget_fx::config::Config;
use budget_fx::fx::ErApiRateSource;
use budget_fx::logging::init_run_logger;
use budget_fx::pipeline::{self, RunSummary};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process;

/// Convert budget amounts in a CSV file from EUR to local currencies.
///
/// `INPUT_FILE` and `OUTPUT_FILE` are the whole required interface. The
/// optional flags only override settings that otherwise come from the config
/// file and its defaults.
#[derive(Parser)]
#[command(name = "budget-fx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert budget amounts in a CSV file from EUR to local currencies", long_about = None)]
struct Cli {
    /// Path to the input CSV file.
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Path to the output CSV file.
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows per batch (overrides the config file)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Print a run summary to stdout
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let log_path = match init_run_logger(&config.logs_dir) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    log::info!("Starting the currency conversion process");
    let summary = match convert(&cli, &config) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("Currency conversion could not run: {:#}", e);
            RunSummary::default()
        }
    };
    log::info!("Currency conversion process completed");

    if cli.verbose {
        print_summary(&cli, &summary, &log_path);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
        config.validate()?;
    }
    Ok(config)
}

fn convert(cli: &Cli, config: &Config) -> anyhow::Result<RunSummary> {
    let source = ErApiRateSource::with_config(
        &config.rates_base_url,
        &config.base_currency,
        config.request_timeout(),
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(runtime.block_on(pipeline::run(
        &source,
        &cli.input_file,
        &cli.output_file,
        config.pipeline_options(),
    )))
}

fn print_summary(cli: &Cli, summary: &RunSummary, log_path: &std::path::Path) {
    println!(
        "{} {} -> {}",
        "budget-fx".cyan().bold(),
        cli.input_file.display(),
        cli.output_file.display()
    );
    println!("  Rates loaded:   {}", summary.rates_loaded);
    println!("  Rows written:   {}", summary.rows_written);
    println!("  Batches:        {}", summary.batches_written);
    if !summary.unknown_currencies.is_empty() {
        let codes: Vec<&str> = summary.unknown_currencies.iter().map(|c| c.as_str()).collect();
        println!("  {} {}", "Unconverted:".yellow(), codes.join(", "));
    }
    if summary.is_complete() {
        println!("  Status:         {}", "complete".green());
    } else {
        println!("  Status:         {}", "incomplete".red());
    }
    println!("  Log file:       {}", log_path.display().to_string().dimmed());
}
