//! Row transformer - derives `budget_local` from `budget_EUR`
//!
//! `budget_local = budget_EUR * rate(local_currency)`, where an unknown currency
//! falls back to a multiplier of 1.0. The transform is pure and has no error
//! path: an unparseable or non-finite amount, or a missing column, yields an
//! empty field.

use crate::fx::ExchangeRateTable;
use crate::types::{Batch, Row, BUDGET_EUR_COLUMN, BUDGET_LOCAL_COLUMN, LOCAL_CURRENCY_COLUMN};
use csv::StringRecord;

/// Column positions resolved once per batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub budget_eur: Option<usize>,
    pub local_currency: Option<usize>,
    /// Set when the input already carries a `budget_local` column
    pub budget_local: Option<usize>,
}

impl ColumnLayout {
    pub fn resolve(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            budget_eur: find(BUDGET_EUR_COLUMN),
            local_currency: find(LOCAL_CURRENCY_COLUMN),
            budget_local: find(BUDGET_LOCAL_COLUMN),
        }
    }

    /// Both input columns are present
    pub fn is_complete(&self) -> bool {
        self.budget_eur.is_some() && self.local_currency.is_some()
    }
}

/// Convert one EUR amount for a currency code.
///
/// `None` when the amount is not a number or the result is not finite
/// (`NaN`, `inf` and overflow all count as missing).
pub fn convert_amount(budget_eur: &str, currency: &str, rates: &ExchangeRateTable) -> Option<f64> {
    let amount: f64 = budget_eur.trim().parse().ok()?;
    Some(amount * rates.multiplier(currency)).filter(|value| value.is_finite())
}

/// Render an amount the way it is written to the output file
///
/// Integral values keep a trailing `.0`; everything else uses the shortest
/// representation that round-trips.
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn local_value(row: &Row, layout: &ColumnLayout, rates: &ExchangeRateTable) -> String {
    let budget = layout.budget_eur.and_then(|idx| row.get(idx));
    let currency = layout.local_currency.and_then(|idx| row.get(idx));
    match (budget, currency) {
        (Some(budget), Some(currency)) => convert_amount(budget, currency, rates)
            .map(format_amount)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Add (or overwrite) `budget_local` on every row of the batch
pub fn transform(batch: Batch, rates: &ExchangeRateTable) -> Batch {
    let layout = ColumnLayout::resolve(&batch.headers);
    let Batch { mut headers, rows } = batch;

    let rows = match layout.budget_local {
        None => {
            headers.push_field(BUDGET_LOCAL_COLUMN);
            rows.into_iter()
                .map(|mut row| {
                    let value = local_value(&row, &layout, rates);
                    row.push_field(&value);
                    row
                })
                .collect()
        }
        Some(existing) => rows
            .into_iter()
            .map(|row| {
                let value = local_value(&row, &layout, rates);
                row.iter()
                    .enumerate()
                    .map(|(i, field)| if i == existing { value.as_str() } else { field })
                    .collect::<StringRecord>()
            })
            .collect(),
    };

    Batch::new(headers, rows)
}

/// Currency codes in the batch with no entry in the rate table
pub fn unknown_currencies<'a>(batch: &'a Batch, rates: &ExchangeRateTable) -> Vec<&'a str> {
    let Some(idx) = batch.column_index(LOCAL_CURRENCY_COLUMN) else {
        return Vec::new();
    };
    batch
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|code| !rates.contains(code))
        .collect()
}
