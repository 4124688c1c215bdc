//! Script row decoding from the index table

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::SHIFT_JIS;
use log::trace;
use super::models::{FieldTag, FieldValue, ScriptRow};
use super::error::{Result, BcsError};

/// Bytes per field: a 4-byte tag word followed by a 4-byte value word.
const FIELD_SIZE: usize = 8;
/// Only the low two bits of a tag word are meaningful.
const TAG_MASK: u32 = 0b11;

/// Decode every row of the index table.
///
/// Rows are `num_cols × 8` bytes wide and walked in order; any residual
/// bytes after the last whole row are non-significant padding. String
/// references resolve into the decrypted TNK body.
pub fn decode_rows(index_table: &[u8], tnk_body: &[u8], num_cols: u32) -> Result<Vec<ScriptRow>> {
    if num_cols == 0 {
        return Err(BcsError::MalformedSizes("column count is zero".to_string()));
    }
    let row_size = num_cols as usize * FIELD_SIZE;
    let mut rows = Vec::with_capacity(index_table.len() / row_size);

    let mut offset = 0;
    while offset + row_size <= index_table.len() {
        let row = decode_row(&index_table[offset..offset + row_size], tnk_body, rows.len())?;
        rows.push(row);
        offset += row_size;
    }
    trace!(
        "decoded {} rows ({} padding bytes)",
        rows.len(),
        index_table.len() - offset
    );
    Ok(rows)
}

/// Decode a single row, field by field, left to right.
///
/// A row whose very first field is tagged empty decodes to a blank row;
/// an empty tag later in the row is just an empty field.
fn decode_row(raw: &[u8], tnk_body: &[u8], row: usize) -> Result<ScriptRow> {
    let mut fields = Vec::with_capacity(raw.len() / FIELD_SIZE);

    for (col, cell) in raw.chunks_exact(FIELD_SIZE).enumerate() {
        let masked = LittleEndian::read_u32(&cell[..4]) & TAG_MASK;
        let value = LittleEndian::read_u32(&cell[4..]);
        let tag = FieldTag::try_from(masked)
            .map_err(|_| BcsError::UnknownFieldTag { tag: masked, row, col })?;

        let field = match tag {
            FieldTag::Empty if col == 0 => return Ok(ScriptRow::blank()),
            FieldTag::Empty => FieldValue::Empty,
            FieldTag::Integer => FieldValue::Integer(value),
            FieldTag::StringRef => FieldValue::Text(resolve_string(tnk_body, value, row, col)?),
        };
        fields.push(field);
    }

    Ok(ScriptRow { fields })
}

/// Resolve a null-terminated Shift-JIS string at `offset` in the TNK body.
///
/// Reading stops at the first NUL byte or at the end of the table,
/// whichever comes first.
fn resolve_string(tnk_body: &[u8], offset: u32, row: usize, col: usize) -> Result<String> {
    let start = offset as usize;
    if start >= tnk_body.len() {
        return Err(BcsError::FieldOutOfRange {
            offset,
            table_len: tnk_body.len(),
            row,
            col,
        });
    }

    let run = &tnk_body[start..];
    let len = run.iter().position(|&b| b == 0).unwrap_or(run.len());
    let (text, _, _) = SHIFT_JIS.decode(&run[..len]);
    Ok(text.into_owned())
}
