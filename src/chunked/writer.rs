//! Chunked CSV writer
//!
//! The first batch creates (or truncates) the output and writes the header; every
//! later batch is appended without one. Each batch is flushed before the next is
//! pulled, so a failure leaves the earlier batches on disk.

use crate::error::Result;
use crate::types::Batch;
use csv::WriterBuilder;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Counters for a finished write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub batches: usize,
    pub rows: usize,
}

type OpenFn<W> = Box<dyn FnOnce() -> io::Result<W>>;

/// Writes batches to one CSV output, header first
pub struct ChunkWriter<W: io::Write = File> {
    writer: Option<csv::Writer<W>>,
    open: Option<OpenFn<W>>,
    header_written: bool,
    stats: WriteStats,
}

impl ChunkWriter<File> {
    /// Writer that creates (or truncates) `path` on the first batch
    pub fn to_path<P: AsRef<Path>>(path: P) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        Self {
            writer: None,
            open: Some(Box::new(move || File::create(path))),
            header_written: false,
            stats: WriteStats::default(),
        }
    }
}

impl<W: io::Write> ChunkWriter<W> {
    /// Writer over an existing byte sink
    pub fn from_writer(wtr: W) -> Self {
        Self {
            writer: Some(csv_writer(wtr)),
            open: None,
            header_written: false,
            stats: WriteStats::default(),
        }
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Recover the underlying sink (flushing first)
    pub fn into_inner(self) -> Option<W> {
        self.writer.and_then(|w| w.into_inner().ok())
    }

    /// Write one batch; the header goes out once, ahead of the first rows
    pub fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                let open = self.open.take().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::BrokenPipe, "output sink already failed")
                })?;
                csv_writer(open()?)
            }
        };
        let writer = self.writer.insert(writer);

        if !self.header_written {
            writer.write_record(&batch.headers)?;
            self.header_written = true;
        }
        for row in &batch.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        self.stats.batches += 1;
        self.stats.rows += batch.len();
        Ok(())
    }
}

fn csv_writer<W: io::Write>(wtr: W) -> csv::Writer<W> {
    WriterBuilder::new().has_headers(false).from_writer(wtr)
}

/// Write a batch sequence to `path`.
///
/// An empty sequence never touches the file. On the first failing batch the
/// error is logged and returned; no further batches are pulled.
pub fn write_chunks<I, P>(batches: I, path: P) -> Result<WriteStats>
where
    I: IntoIterator<Item = Batch>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    log::info!("Writing CSV file in chunks to {}", path.display());

    let mut writer = ChunkWriter::to_path(path);
    for batch in batches {
        if let Err(e) = writer.write_batch(&batch) {
            log::error!("Error writing CSV file in chunks: {}", e);
            return Err(e);
        }
    }

    let stats = writer.stats();
    log::info!(
        "Wrote {} rows in {} batches to {}",
        stats.rows,
        stats.batches,
        path.display()
    );
    Ok(stats)
}
