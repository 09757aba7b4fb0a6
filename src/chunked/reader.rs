//! Chunked CSV reader
//!
//! Yields [`Batch`]es of at most `chunk_size` rows in file order. Only one batch
//! is materialized at a time. Rows with fewer fields than the header are padded
//! with empty fields. A row with more fields than the header, or any other read
//! error, discards the batch being assembled and ends the sequence; the error is
//! logged and kept for [`ChunkReader::error`].

use crate::error::{FxError, Result};
use crate::types::{Batch, Row};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io;
use std::path::Path;

/// Forward-only batch iterator over a CSV source
pub struct ChunkReader<R = File> {
    reader: Option<csv::Reader<R>>,
    headers: Option<StringRecord>,
    chunk_size: usize,
    batches_read: usize,
    rows_read: usize,
    finished: bool,
    error: Option<FxError>,
}

/// Open `path` for chunked reading.
///
/// An open failure is logged and produces a reader that yields nothing. Calling
/// this again re-reads the file from the start.
pub fn read_chunks<P: AsRef<Path>>(path: P, chunk_size: usize) -> ChunkReader<File> {
    let path = path.as_ref();
    log::info!("Reading CSV file in chunks from {}", path.display());

    match open_csv(path) {
        Ok(reader) => ChunkReader::with_reader(reader, chunk_size),
        Err(e) => {
            log::error!("Error reading CSV file in chunks: {}", e);
            let mut reader = ChunkReader::detached(chunk_size);
            reader.error = Some(e);
            reader
        }
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    Ok(ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?)
}

impl<R: io::Read> ChunkReader<R> {
    /// Read batches from any byte source
    pub fn from_reader(rdr: R, chunk_size: usize) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);
        Self::with_reader(reader, chunk_size)
    }

    fn with_reader(reader: csv::Reader<R>, chunk_size: usize) -> Self {
        Self {
            reader: Some(reader),
            ..Self::detached(chunk_size)
        }
    }

    fn detached(chunk_size: usize) -> Self {
        Self {
            reader: None,
            headers: None,
            chunk_size: chunk_size.max(1),
            batches_read: 0,
            rows_read: 0,
            finished: false,
            error: None,
        }
    }

    /// Error that ended the sequence early, if any
    pub fn error(&self) -> Option<&FxError> {
        self.error.as_ref()
    }

    /// Number of batches yielded so far
    pub fn batches_read(&self) -> usize {
        self.batches_read
    }

    /// Number of data rows yielded so far
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn fail(&mut self, error: FxError) -> Option<Batch> {
        log::error!("Error reading CSV file in chunks: {}", error);
        self.error = Some(error);
        self.finished = true;
        None
    }

    fn load_headers(&mut self) -> std::result::Result<StringRecord, csv::Error> {
        if let Some(headers) = &self.headers {
            return Ok(headers.clone());
        }
        let headers = match self.reader.as_mut() {
            Some(reader) => reader.headers()?.clone(),
            None => StringRecord::new(),
        };
        self.headers = Some(headers.clone());
        Ok(headers)
    }
}

impl<R: io::Read> Iterator for ChunkReader<R> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.finished || self.reader.is_none() {
            return None;
        }

        let headers = match self.load_headers() {
            Ok(headers) => headers,
            Err(e) => return self.fail(e.into()),
        };

        // No header line at all: nothing to convert
        if headers.is_empty() {
            log::warn!("CSV input has no header row");
            self.finished = true;
            return None;
        }

        let chunk_size = self.chunk_size;
        let mut rows: Vec<Row> = Vec::with_capacity(chunk_size.min(1024));
        let mut record = StringRecord::new();
        let mut exhausted = false;

        if let Some(reader) = self.reader.as_mut() {
            while rows.len() < chunk_size {
                match reader.read_record(&mut record) {
                    Ok(true) if record.len() > headers.len() => {
                        let line = record.position().map_or(0, |p| p.line());
                        let error = FxError::MalformedRow {
                            line,
                            expected: headers.len(),
                            found: record.len(),
                        };
                        return self.fail(error);
                    }
                    Ok(true) => rows.push(pad_record(&record, headers.len())),
                    Ok(false) => {
                        exhausted = true;
                        break;
                    }
                    Err(e) => return self.fail(e.into()),
                }
            }
        }

        if exhausted {
            self.finished = true;
        }

        if rows.is_empty() {
            // Header-only input still yields one empty batch so the header is written
            if self.batches_read == 0 {
                self.batches_read = 1;
                return Some(Batch::empty(headers));
            }
            return None;
        }

        self.batches_read += 1;
        self.rows_read += rows.len();
        log::debug!(
            "Read batch {} ({} rows, {} total)",
            self.batches_read,
            rows.len(),
            self.rows_read
        );
        Some(Batch::new(headers, rows))
    }
}

/// Copy `record`, filling missing trailing fields with empty strings
fn pad_record(record: &StringRecord, width: usize) -> Row {
    let mut row = record.clone();
    while row.len() < width {
        row.push_field("");
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "id,budget_EUR,local_currency\n1,100,USD\n2,50,GBP\n3,20,JPY\n4,10,ZZZ\n5,5,EUR\n";

    #[test]
    fn test_batches_respect_chunk_size() {
        let reader = ChunkReader::from_reader(SAMPLE.as_bytes(), 2);
        let sizes: Vec<usize> = reader.map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_batch() {
        let data = "a,b\n1,2\n3,4\n";
        let sizes: Vec<usize> = ChunkReader::from_reader(data.as_bytes(), 2)
            .map(|b| b.len())
            .collect();
        assert_eq!(sizes, vec![2]);
    }

    #[test]
    fn test_rows_in_file_order() {
        let ids: Vec<String> = ChunkReader::from_reader(SAMPLE.as_bytes(), 3)
            .flat_map(|b| b.rows.into_iter().map(|r| r[0].to_string()))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_header_only_yields_one_empty_batch() {
        let batches: Vec<Batch> = ChunkReader::from_reader("a,b\n".as_bytes(), 10).collect();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
        assert_eq!(batches[0].headers, StringRecord::from(vec!["a", "b"]));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let mut reader = ChunkReader::from_reader("".as_bytes(), 10);
        assert!(reader.next().is_none());
        assert!(reader.error().is_none());
    }

    #[test]
    fn test_long_row_ends_sequence_without_partial_batch() {
        let data = "a,b\n1,2\n3,4\n5,6,7\n7,8\n";
        let mut reader = ChunkReader::from_reader(data.as_bytes(), 10);
        assert!(reader.next().is_none());
        assert!(matches!(
            reader.error(),
            Some(FxError::MalformedRow {
                line: 4,
                expected: 2,
                found: 3
            })
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_short_row_is_padded() {
        let data = "budget_EUR,local_currency,note\n1,USD,a\n2,USD\n3,USD,c\n";
        let batches: Vec<Batch> = ChunkReader::from_reader(data.as_bytes(), 10).collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[0].rows[1], StringRecord::from(vec!["2", "USD", ""]));
        assert_eq!(batches[0].rows[2], StringRecord::from(vec!["3", "USD", "c"]));
    }

    #[test]
    fn test_long_row_keeps_earlier_batches() {
        let data = "a,b\n1,2\n3,4\n5,6,7\n";
        let mut reader = ChunkReader::from_reader(data.as_bytes(), 2);
        assert_eq!(reader.next().map(|b| b.len()), Some(2));
        assert!(reader.next().is_none());
        assert!(reader.error().is_some());
        assert_eq!(reader.rows_read(), 2);
    }

    #[test]
    fn test_zero_chunk_size_treated_as_one() {
        let reader = ChunkReader::from_reader(SAMPLE.as_bytes(), 0);
        assert_eq!(reader.chunk_size(), 1);
        assert_eq!(reader.count(), 5);
    }

    #[test]
    fn test_missing_file_yields_nothing() {
        let mut reader = read_chunks("/nonexistent/input.csv", 10);
        assert!(reader.next().is_none());
        assert!(matches!(reader.error(), Some(FxError::CsvError(_))));
    }

    #[test]
    fn test_fresh_call_rereads_from_start() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let first: usize = read_chunks(file.path(), 2).map(|b| b.len()).sum();
        let second: usize = read_chunks(file.path(), 2).map(|b| b.len()).sum();
        assert_eq!(first, 5);
        assert_eq!(second, 5);
    }
}
