//! Core types and constants

use csv::StringRecord;

/// Column holding the EUR amount
pub const BUDGET_EUR_COLUMN: &str = "budget_EUR";

/// Column holding the row's currency code
pub const LOCAL_CURRENCY_COLUMN: &str = "local_currency";

/// Derived column appended by the transformer
pub const BUDGET_LOCAL_COLUMN: &str = "budget_local";

/// Default number of rows per batch
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Currency code type (short uppercase string, e.g. "USD")
pub type CurrencyCode = String;

/// One CSV record, interpreted against its batch header
pub type Row = StringRecord;

/// A bounded group of rows sharing one header
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub headers: StringRecord,
    pub rows: Vec<Row>,
}

impl Batch {
    /// Create a batch from a header and its rows
    pub fn new(headers: StringRecord, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Create an empty batch carrying only a header
    pub fn empty(headers: StringRecord) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Field of a row by column name
    pub fn field<'a>(&self, row: &'a Row, name: &str) -> Option<&'a str> {
        self.column_index(name).and_then(|idx| row.get(idx))
    }
}
