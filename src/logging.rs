//! Per-run log file setup
//!
//! Each run writes to its own timestamped file under the logs directory, e.g.
//! `logs/run_18_10_26_14_03_59.log`. Lines look like
//! `2026-10-18 14:03:59,123 - budget_fx::pipeline - INFO - message`.

use crate::error::{FxError, Result};
use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name for a run started at `now`
pub fn log_file_name(now: DateTime<Local>) -> String {
    now.format("run_%d_%m_%y_%H_%M_%S.log").to_string()
}

/// Create `dir` and the run's log file, and route the `log` facade to it.
///
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
/// Returns the path of the new log file.
pub fn init_run_logger(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(Local::now()));
    let file = File::create(&path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| FxError::LoggingError(e.to_string()))?;

    Ok(path)
}
