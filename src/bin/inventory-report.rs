//! inventory-report CLI - run the inventory analytics and export the results
//!
//! ```bash
//! inventory-report data/inventory.parquet data/selected_users.parquet --out-dir data/task_results
//! ```

use budget_fx::analytics::InventoryReport;
use budget_fx::logging::init_run_logger;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process;

/// Inventory analytics over parquet datasets
#[derive(Parser)]
#[command(name = "inventory-report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run inventory analytics and export each result as CSV", long_about = None)]
struct Cli {
    /// Inventory parquet file
    #[arg(value_name = "INVENTORY")]
    inventory: PathBuf,

    /// Selected users parquet file
    #[arg(value_name = "SELECTED_USERS")]
    selected_users: PathBuf,

    /// Directory for the result tables
    #[arg(short, long, default_value = "data/task_results")]
    out_dir: PathBuf,

    /// Logs directory
    #[arg(long, default_value = "logs")]
    logs_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_run_logger(&cli.logs_dir) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }

    let result = InventoryReport::from_parquet(&cli.inventory, &cli.selected_users)
        .and_then(|report| report.run(&cli.out_dir));

    match result {
        Ok(tables) => {
            for table in tables {
                println!(
                    "{} {} ({} rows)",
                    "Wrote".green(),
                    table.path.display(),
                    table.rows
                );
            }
        }
        Err(e) => {
            log::error!("Inventory report failed: {}", e);
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
