//! Segmentation of the decompressed buffer into its logical tables

use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use super::models::{ContainerHeader, TableLayout};
use super::error::{Result, BcsError};

/// The opaque header prefixing the string table region.
pub const TNK_HEADER_SIZE: usize = 12;

/// Carve the decompressed buffer into column count, index table, and
/// string table body.
///
/// Buffer layout, left to right:
/// - first table: `object_count × 8` bytes; its leading u32 is the column count
/// - index table: `object_parts_count × 8` bytes
/// - string table: 12-byte TNK header, then the cipher-protected body
///
/// All bounds are validated here once so downstream stages can index their
/// ranges without further checks.
pub fn split(unpacked: &[u8], header: &ContainerHeader) -> Result<TableLayout> {
    let first_size = header.first_table_size();
    let index_size = header.index_table_size();

    if first_size < 4 {
        return Err(BcsError::MalformedSizes(format!(
            "first table of {} bytes cannot hold a column count",
            first_size
        )));
    }
    let tables_end = first_size + index_size;
    if tables_end > unpacked.len() {
        return Err(BcsError::MalformedSizes(format!(
            "tables need {} bytes but the unpacked buffer holds {}",
            tables_end,
            unpacked.len()
        )));
    }
    let string_table_len = unpacked.len() - tables_end;
    if string_table_len < TNK_HEADER_SIZE {
        return Err(BcsError::MalformedSizes(format!(
            "string table of {} bytes is shorter than its {}-byte header",
            string_table_len, TNK_HEADER_SIZE
        )));
    }

    let num_cols = LittleEndian::read_u32(&unpacked[..4]);
    if num_cols == 0 {
        return Err(BcsError::MalformedSizes(
            "column count is zero".to_string(),
        ));
    }

    debug!(
        "layout: cols={} index={}..{} tnk body={}..{}",
        num_cols,
        first_size,
        tables_end,
        tables_end + TNK_HEADER_SIZE,
        unpacked.len()
    );
    Ok(TableLayout {
        num_cols,
        index_table: first_size..tables_end,
        tnk_body: tables_end + TNK_HEADER_SIZE..unpacked.len(),
    })
}
