//! Foreign Exchange (FX) rates
//!
//! # Components
//!
//! - **table**: the immutable per-run rate table
//! - **source**: rate sources (HTTP service, static table)
//!
//! # Example
//!
//! ```rust
//! use budget_fx::fx::{ExchangeRateTable, RateSource, StaticRateSource};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let source = StaticRateSource::new(ExchangeRateTable::from_pairs([("USD", 1.1)]));
//! let rates = rt.block_on(source.fetch_rates());
//! assert_eq!(rates.multiplier("USD"), 1.1);
//! ```

pub mod source;
pub mod table;

pub use source::{
    ErApiRateSource, RateSource, StaticRateSource, DEFAULT_BASE_CURRENCY,
    DEFAULT_RATES_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
pub use table::{ExchangeRateTable, FALLBACK_MULTIPLIER};
