//! Chunked CSV I/O
//!
//! Reads and writes tabular files in bounded batches instead of loading them
//! whole.

pub mod reader;
pub mod writer;

pub use reader::{read_chunks, ChunkReader};
pub use writer::{write_chunks, ChunkWriter, WriteStats};
