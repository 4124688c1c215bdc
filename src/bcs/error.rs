//! Custom error types for the bcs-extractor crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum BcsError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `TSV` container magic.
    #[error("not a BCS container: first bytes are {found:02x?}")]
    InvalidMagic { found: [u8; 3] },

    /// The file ended before the fixed-size container header was complete.
    #[error("truncated header: expected {expected} bytes, got {found}")]
    TruncatedHeader { expected: usize, found: usize },

    /// The compressed body ended before the declared unpacked size was reached.
    #[error("truncated LZSS stream: produced {produced} of {expected} bytes")]
    TruncatedStream { expected: usize, produced: usize },

    /// Header size fields are inconsistent with the decompressed buffer.
    #[error("malformed table sizes: {0}")]
    MalformedSizes(String),

    /// A field tag word carries a value outside the known set {0, 1, 3}.
    #[error("unknown field tag {tag:#x} at row {row}, column {col}")]
    UnknownFieldTag { tag: u32, row: usize, col: usize },

    /// A decoded string offset points past the end of the string table.
    #[error("string offset {offset} out of range for {table_len}-byte string table (row {row}, column {col})")]
    FieldOutOfRange {
        offset: u32,
        table_len: usize,
        row: usize,
        col: usize,
    },

    /// A CSV file has no `%text%` column to reflow.
    #[error("no text column in {}", .0.display())]
    MissingTextColumn(PathBuf),

    /// An error occurred while decrypting the string table.
    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// A convenience `Result` type alias using the crate's `BcsError` type.
pub type Result<T> = std::result::Result<T, BcsError>;
