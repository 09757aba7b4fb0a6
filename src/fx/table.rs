//! Exchange rate table - immutable currency code to EUR-relative multiplier map

use crate::error::{FxError, Result};
use crate::types::CurrencyCode;
use hashbrown::HashMap;

/// Multiplier applied when a currency code has no known rate
pub const FALLBACK_MULTIPLIER: f64 = 1.0;

/// Rates for one run, relative to a single base currency (EUR).
///
/// Every stored rate is positive and finite. The table is built once and only
/// read afterwards, so it is shared by reference without locking.
///
/// # Example
/// ```
/// use budget_fx::fx::ExchangeRateTable;
///
/// let table = ExchangeRateTable::from_pairs([("USD", 1.1)]);
/// assert_eq!(table.get("USD"), Some(1.1));
/// assert_eq!(table.multiplier("ZZZ"), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeRateTable {
    rates: HashMap<CurrencyCode, f64>,
}

impl ExchangeRateTable {
    /// Create an empty table (every lookup misses)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw rates, dropping non-positive or non-finite entries
    pub fn from_rates<I>(rates: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut table = HashMap::new();
        for (code, rate) in rates {
            match validate_rate(&code, rate) {
                Ok(rate) => {
                    table.insert(code, rate);
                }
                Err(e) => log::warn!("Skipping rate: {}", e),
            }
        }
        Self { rates: table }
    }

    /// Convenience constructor from borrowed pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self::from_rates(pairs.into_iter().map(|(c, r)| (c.to_string(), r)))
    }

    /// Rate for a currency code, if known
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Rate for a currency code, or 1.0 when unknown
    pub fn multiplier(&self, code: &str) -> f64 {
        self.get(code).unwrap_or(FALLBACK_MULTIPLIER)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Known currency codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(|c| c.as_str()).collect();
        codes.sort_unstable();
        codes
    }
}

fn validate_rate(code: &str, rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(FxError::InvalidRate {
            code: code.to_string(),
            rate,
        });
    }
    Ok(rate)
}
