//! Core BCS container decoding module

pub mod models;
pub mod error;
pub mod header;
pub mod lzss;
pub mod segment;
pub mod crypto;
pub mod decoder;
pub mod csv;
pub mod format;

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use encoding_rs::SHIFT_JIS;
use log::info;
use rayon::prelude::*;
use models::ScriptRow;
pub use error::{BcsError, Result};

/// A fully decoded BCS script table.
///
/// Holds the resolved rows in index-table order; the backing buffers are
/// released once decoding finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTable {
    pub num_cols: u32,
    pub rows: Vec<ScriptRow>,
}

impl ScriptTable {
    /// Decode a BCS container file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The magic or header is invalid
    /// - The compressed body ends before the declared unpacked size
    /// - Table sizes, field tags, or string offsets are inconsistent
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening BCS container: {}", path.display());
        let mut file = File::open(path)?;
        Self::from_reader(&mut file)
    }

    /// Decode a BCS container from any byte source.
    ///
    /// Pipeline: header validation, LZSS decompression of the body,
    /// segmentation of the unpacked buffer, in-place decryption of the
    /// string table, then per-row field decoding.
    pub fn from_reader<R: Read>(input: &mut R) -> Result<Self> {
        let container = header::parse(input)?;
        let mut unpacked = lzss::unpack(input, container.unpacked_size as usize, false)?;

        let layout = segment::split(&unpacked, &container)?;
        crypto::decrypt_tnk_body(&mut unpacked[layout.tnk_body.clone()])?;

        let rows = decoder::decode_rows(
            &unpacked[layout.index_table.clone()],
            &unpacked[layout.tnk_body.clone()],
            layout.num_cols,
        )?;

        info!("decoded {} rows of {} columns", rows.len(), layout.num_cols);
        Ok(Self {
            num_cols: layout.num_cols,
            rows,
        })
    }

    /// Render the table as CSV text with `\r\n` line terminators.
    pub fn to_csv(&self) -> String {
        csv::render_rows(&self.rows)
    }
}

/// Options for container extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub overwrite: bool,
}

/// What happened to a single file at the batch boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The output file was produced.
    Written(PathBuf),
    /// The output already exists and overwriting is disabled.
    AlreadyExists(PathBuf),
    /// The input is not a recognizable container (or not a `.csv` for the
    /// reflow pass).
    NotRecognized,
    /// The input has no text column to reflow.
    NoTextColumn,
}

/// Extract one container to `<stem>.csv` inside `out_dir`.
///
/// Inputs without the container magic are skipped, not failed, so a batch
/// can sweep a directory of mixed files. With `overwrite` unset an existing
/// output short-circuits before any decoding happens.
pub fn extract_file(input: &Path, out_dir: &Path, opts: &ExtractOptions) -> Result<Outcome> {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut dest = out_dir.join(stem);
    dest.set_extension("csv");

    if !opts.overwrite && dest.exists() {
        return Ok(Outcome::AlreadyExists(dest));
    }

    let table = match ScriptTable::read(input) {
        Ok(table) => table,
        Err(BcsError::InvalidMagic { .. }) => {
            info!("skipping {}: not a BCS container", input.display());
            return Ok(Outcome::NotRecognized);
        }
        Err(e) => return Err(e),
    };

    let text = table.to_csv();
    let (encoded, _, _) = SHIFT_JIS.encode(&text);
    fs::write(&dest, encoded)?;
    info!("extracted {} -> {}", input.display(), dest.display());
    Ok(Outcome::Written(dest))
}

/// Extract every recognizable container directly inside `input`.
///
/// Files are independent, so the batch runs on the rayon pool. Each file's
/// result is collected separately: a corrupt container surfaces as an `Err`
/// for that file alone and never aborts the rest of the batch.
pub fn extract_dir(
    input: &Path,
    out_dir: &Path,
    opts: &ExtractOptions,
) -> Result<Vec<(PathBuf, Result<Outcome>)>> {
    let files = regular_files(input)?;
    info!("extracting {} files from {}", files.len(), input.display());
    Ok(files
        .par_iter()
        .map(|path| (path.clone(), extract_file(path, out_dir, opts)))
        .collect())
}

/// The regular files directly inside `dir`, sorted for stable reporting.
/// Subdirectories are not descended into.
pub(crate) fn regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
