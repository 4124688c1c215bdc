//! Data structures representing BCS container components

use std::ops::Range;
use super::error::{BcsError, Result};

/// Parsed BCS container header.
///
/// Fixed 24 bytes at file offset 0: the 3-byte `TSV` magic followed by five
/// little-endian u32 fields. `object_mark` and `body_size` are carried for
/// completeness but unused by decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub unpacked_size: u32,
    pub object_count: u32,
    pub object_mark: u32,
    pub object_parts_count: u32,
    pub body_size: u32,
}

impl ContainerHeader {
    /// Size in bytes of the first table (one 8-byte entry per object).
    /// Only its leading u32, the column count, is meaningful.
    pub fn first_table_size(&self) -> usize {
        self.object_count as usize * 8
    }

    /// Size in bytes of the row index table (one 8-byte entry per object part).
    pub fn index_table_size(&self) -> usize {
        self.object_parts_count as usize * 8
    }
}

/// Byte ranges of the logical tables inside the decompressed buffer.
///
/// The buffer is the sole backing store; the index table and the TNK body
/// are views into it, never copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Number of fields per row, read from the head of the first table.
    pub num_cols: u32,
    /// The row index table region.
    pub index_table: Range<usize>,
    /// The string table body, past the 12-byte TNK header.
    pub tnk_body: Range<usize>,
}

/// The low two bits of a field's tag word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    /// Terminates a row when it appears first; an empty field otherwise.
    Empty,
    /// The value word is a plain unsigned integer.
    Integer,
    /// The value word is a byte offset into the string table body.
    StringRef,
}

impl TryFrom<u32> for FieldTag {
    type Error = BcsError;

    /// `masked` must already be reduced to the low two bits; tag value 2 is
    /// unobserved in the format and rejected rather than guessed at.
    fn try_from(masked: u32) -> Result<Self> {
        match masked {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Integer),
            3 => Ok(Self::StringRef),
            tag => Err(BcsError::UnknownFieldTag { tag, row: 0, col: 0 }),
        }
    }
}

/// A resolved field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(u32),
    Text(String),
    Empty,
}

/// One decoded script row.
///
/// `fields` has `num_cols` entries, or none at all for a blank row (a row
/// whose first field is tagged [`FieldTag::Empty`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRow {
    pub fields: Vec<FieldValue>,
}

impl ScriptRow {
    pub fn blank() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn is_blank(&self) -> bool {
        self.fields.is_empty()
    }
}
