//! BCS container header parsing

use std::io::{self, Read};
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use super::models::ContainerHeader;
use super::error::{Result, BcsError};

/// The fixed header size. The LZSS body starts immediately after it.
pub const HEADER_SIZE: usize = 24;

/// Magic identifying a BCS container.
pub const MAGIC: &[u8; 3] = b"TSV";

/// Parse the BCS file header.
///
/// Header structure (all integers little-endian):
/// - 3 bytes: `TSV` magic (byte 3 is unused)
/// - 4 bytes: unpacked size of the decompressed buffer
/// - 4 bytes: object count (first table entries)
/// - 4 bytes: object mark (unused by decoding)
/// - 4 bytes: object parts count (index table entries)
/// - 4 bytes: body size (unused by decoding)
///
/// A source shorter than the magic is reported as [`BcsError::InvalidMagic`]
/// so that arbitrary small files in a batch are skipped, not failed; a valid
/// magic on a short header is [`BcsError::TruncatedHeader`].
pub fn parse<R: Read>(input: &mut R) -> Result<ContainerHeader> {
    let mut raw = [0u8; HEADER_SIZE];
    let filled = read_up_to(input, &mut raw)?;

    let mut magic = [0u8; 3];
    magic.copy_from_slice(&raw[..3]);
    if filled < MAGIC.len() || magic != *MAGIC {
        return Err(BcsError::InvalidMagic { found: magic });
    }
    if filled < HEADER_SIZE {
        return Err(BcsError::TruncatedHeader {
            expected: HEADER_SIZE,
            found: filled,
        });
    }

    let header = ContainerHeader {
        unpacked_size: LittleEndian::read_u32(&raw[4..8]),
        object_count: LittleEndian::read_u32(&raw[8..12]),
        object_mark: LittleEndian::read_u32(&raw[12..16]),
        object_parts_count: LittleEndian::read_u32(&raw[16..20]),
        body_size: LittleEndian::read_u32(&raw[20..24]),
    };
    debug!(
        "header: unpacked={} objects={} parts={} body={}",
        header.unpacked_size, header.object_count, header.object_parts_count, header.body_size
    );
    Ok(header)
}

/// Fill `buf` from `input`, stopping early at end of stream.
/// Returns the number of bytes actually read.
fn read_up_to<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
