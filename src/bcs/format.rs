//! Word-wrap reflow for extracted CSV scripts

use std::fs;
use std::path::{Path, PathBuf};
use encoding_rs::SHIFT_JIS;
use log::{debug, info};
use rayon::prelude::*;
use super::csv::{escape_field, LINE_TERMINATOR};
use super::error::{Result, BcsError};
use super::{regular_files, Outcome};

/// Options for the reflow pass.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub overwrite: bool,
    /// Keep existing literal `\n` markers instead of collapsing them to
    /// spaces before re-wrapping.
    pub keep_newlines: bool,
    /// Wrap threshold in characters.
    pub wrap_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            keep_newlines: false,
            wrap_length: 50,
        }
    }
}

/// Reflow one extracted `.csv` script into `out_dir`.
///
/// The column whose header cell reads `%text%` (or `%text`) is re-wrapped
/// at `wrap_length` characters by inserting literal `\n` markers; every
/// other cell passes through untouched. Inputs without the `.csv`
/// extension, or without a text column, are skipped rather than failed.
pub fn format_file(input: &Path, out_dir: &Path, opts: &FormatOptions) -> Result<Outcome> {
    if input.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Ok(Outcome::NotRecognized);
    }

    let file_name = input.file_name().unwrap_or(input.as_os_str());
    let dest = out_dir.join(file_name);
    if !opts.overwrite && dest.exists() {
        return Ok(Outcome::AlreadyExists(dest));
    }

    let data = fs::read(input)?;
    let (text, _, _) = SHIFT_JIS.decode(&data);

    let reflowed = match reformat(input, &text, opts) {
        Ok(reflowed) => reflowed,
        Err(BcsError::MissingTextColumn(_)) => return Ok(Outcome::NoTextColumn),
        Err(e) => return Err(e),
    };

    let (encoded, _, _) = SHIFT_JIS.encode(&reflowed);
    fs::write(&dest, encoded)?;
    info!("reflowed {} -> {}", input.display(), dest.display());
    Ok(Outcome::Written(dest))
}

/// Reflow every `.csv` file directly inside `input`.
///
/// Files are independent, so the batch runs on the rayon pool; each file's
/// result is collected separately and one failure never stops the rest.
pub fn format_dir(
    input: &Path,
    out_dir: &Path,
    opts: &FormatOptions,
) -> Result<Vec<(PathBuf, Result<Outcome>)>> {
    let files = regular_files(input)?;
    info!("reflowing {} files from {}", files.len(), input.display());
    Ok(files
        .par_iter()
        .map(|path| (path.clone(), format_file(path, out_dir, opts)))
        .collect())
}

/// Rebuild the CSV text with the text column re-wrapped.
fn reformat(input: &Path, text: &str, opts: &FormatOptions) -> Result<String> {
    let mut records = parse_records(text).into_iter();
    let header = records
        .next()
        .ok_or_else(|| BcsError::MissingTextColumn(input.to_path_buf()))?;

    let text_index = header
        .iter()
        .position(|cell| cell == "%text%" || cell == "%text")
        .ok_or_else(|| BcsError::MissingTextColumn(input.to_path_buf()))?;
    debug!("text column of {} is {}", input.display(), text_index);

    // Header passes through verbatim.
    let mut out = header.join(",");
    out.push_str(LINE_TERMINATOR);

    for mut record in records {
        if let Some(cell) = record.get_mut(text_index) {
            *cell = reflow_text(cell, opts.wrap_length, opts.keep_newlines);
        }
        let line: Vec<String> = record
            .iter()
            .map(|cell| escape_field(cell).into_owned())
            .collect();
        out.push_str(&line.join(","));
        out.push_str(LINE_TERMINATOR);
    }
    Ok(out)
}

/// Greedily wrap `text` by inserting literal `\n` markers.
///
/// Unless `keep_newlines` is set, existing `\n` markers are collapsed to
/// spaces first. The running count follows the original script tooling:
/// a joining space counts 1, each word counts its characters, and a word
/// that would push the count past `wrap_length` starts a new line instead.
pub fn reflow_text(text: &str, wrap_length: usize, keep_newlines: bool) -> String {
    let source = if keep_newlines {
        text.to_string()
    } else {
        text.replace("\\n", " ")
    };

    let mut out = String::new();
    let mut count = 0usize;
    for word in source.split(' ') {
        let word_len = word.chars().count();
        if !out.is_empty() {
            if word_len + 1 + count > wrap_length {
                out.push_str("\\n");
                count = 0;
            } else {
                out.push(' ');
                count += 1;
            }
        }
        out.push_str(word);
        count += word_len;
    }
    out
}

/// Parse CSV records line by line.
///
/// Mirrors the original parser settings: `,` delimiter, quoted fields with
/// doubled embedded quotes, `#` comment lines, no whitespace trimming.
/// Blank lines separate nothing and are skipped.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_record)
        .collect()
}

fn parse_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
        } else {
            match c {
                ',' => fields.push(std::mem::take(&mut cell)),
                '"' if cell.is_empty() => in_quotes = true,
                _ => cell.push(c),
            }
        }
    }
    fields.push(cell);
    fields
}
