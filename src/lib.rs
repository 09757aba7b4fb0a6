//! # budget-fx
//!
//! Converts the `budget_EUR` column of a CSV file into each row's local currency,
//! streaming the file in bounded batches with exchange rates fetched once per
//! run. Also ships a small set of inventory analytics queries over parquet.
//!
//! ## Example
//!
//! ```rust,no_run
//! use budget_fx::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = ErApiRateSource::new()?;
//!     let summary = run(&source, "budgets.csv", "budgets_local.csv", PipelineOptions::default()).await;
//!     println!("converted {} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod chunked;
pub mod config;
pub mod error;
pub mod fx;
pub mod logging;
pub mod pipeline;
pub mod transform;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::chunked::{read_chunks, write_chunks, ChunkReader, ChunkWriter, WriteStats};
    pub use crate::config::Config;
    pub use crate::error::{FxError, Result};
    pub use crate::fx::{ErApiRateSource, ExchangeRateTable, RateSource, StaticRateSource};
    pub use crate::pipeline::{convert_file, run, PipelineOptions, RunSummary};
    pub use crate::transform::transform;
    pub use crate::types::*;
}
