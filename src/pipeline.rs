//! Conversion pipeline - rate source → chunked reader → transformer → chunked writer
//!
//! Batches are pulled lazily and processed strictly in file order, so at most one
//! batch is in memory at a time. Failures are logged and recorded in the
//! [`RunSummary`]; none of them aborts the run.

use crate::chunked::{read_chunks, write_chunks};
use crate::fx::{ExchangeRateTable, RateSource};
use crate::transform::{transform, unknown_currencies, ColumnLayout};
use crate::types::{Batch, DEFAULT_CHUNK_SIZE};
use std::collections::BTreeSet;
use std::path::Path;

/// Pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum rows per batch
    pub chunk_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Outcome of one conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Number of rates available to the run
    pub rates_loaded: usize,
    pub batches_written: usize,
    pub rows_written: usize,
    /// Currency codes that fell back to a 1.0 multiplier
    pub unknown_currencies: BTreeSet<String>,
    /// The input ended early because of a read error
    pub read_failed: bool,
    /// Writing stopped because of an I/O error
    pub write_failed: bool,
}

impl RunSummary {
    /// Every input row was read and written
    pub fn is_complete(&self) -> bool {
        !self.read_failed && !self.write_failed
    }

    fn note_batch(&mut self, batch: &Batch, rates: &ExchangeRateTable) {
        if self.batches_written == 0 && !ColumnLayout::resolve(&batch.headers).is_complete() {
            log::warn!(
                "Input is missing budget_EUR or local_currency; budget_local will be empty"
            );
        }
        for code in unknown_currencies(batch, rates) {
            if !self.unknown_currencies.contains(code) {
                log::warn!("No exchange rate found for {}, using multiplier 1.0", code);
                self.unknown_currencies.insert(code.to_string());
            }
        }
    }
}

/// Fetch rates once, then convert `input_path` into `output_path`
pub async fn run<S, P, Q>(
    source: &S,
    input_path: P,
    output_path: Q,
    options: PipelineOptions,
) -> RunSummary
where
    S: RateSource,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    log::info!("Fetching exchange rates from {}", source.name());
    let rates = source.fetch_rates().await;
    if rates.is_empty() {
        log::warn!("Exchange rate table is empty; amounts are copied unconverted");
    }

    convert_file(&rates, input_path, output_path, options)
}

/// Stream `input_path` through the transformer into `output_path`
pub fn convert_file<P, Q>(
    rates: &ExchangeRateTable,
    input_path: P,
    output_path: Q,
    options: PipelineOptions,
) -> RunSummary
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut summary = RunSummary {
        rates_loaded: rates.len(),
        ..RunSummary::default()
    };
    let mut last_batch_rows = 0;

    let mut reader = read_chunks(input_path, options.chunk_size);
    let batches = reader.by_ref().map(|batch| {
        summary.note_batch(&batch, rates);
        summary.batches_written += 1;
        summary.rows_written += batch.len();
        last_batch_rows = batch.len();
        transform(batch, rates)
    });

    if write_chunks(batches, output_path).is_err() {
        // Logged by the writer; the failing batch does not count as written
        summary.write_failed = true;
        summary.batches_written -= 1;
        summary.rows_written -= last_batch_rows;
    }
    summary.read_failed = reader.error().is_some();

    log::info!(
        "Converted {} rows in {} batches ({} unknown currencies)",
        summary.rows_written,
        summary.batches_written,
        summary.unknown_currencies.len()
    );
    if !summary.is_complete() {
        log::error!("Conversion did not complete; output may be truncated");
    }
    summary
}
