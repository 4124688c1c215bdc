//! # bcs-extractor
//!
//! A decoder for BCS script containers: an LZSS-compressed body holding a
//! row index table and a Blowfish-protected Shift-JIS string table, written
//! back out as CSV. Decode-only; re-encoding containers is out of scope.
pub mod bcs;

// Re-export the main types for convenience
pub use bcs::{
    extract_dir, extract_file,
    format::{format_dir, format_file, FormatOptions},
    models::{ContainerHeader, FieldValue, ScriptRow, TableLayout},
    BcsError, ExtractOptions, Outcome, Result, ScriptTable,
};
