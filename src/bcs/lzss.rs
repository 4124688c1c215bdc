//! LZSS-family decompression for the BCS container body

use std::io::{self, Read};
use log::trace;
use super::error::{Result, BcsError};

/// Size of the circular history buffer.
pub const FRAME_SIZE: usize = 0x1000;
const FRAME_MASK: usize = 0xFFF;
/// Initial write cursor position inside the frame.
const FRAME_INIT_POS: usize = 0xFEE;

/// Decompress exactly `target_len` bytes from `input`.
///
/// The stream is a sequence of control bytes, each governing up to eight
/// following operations, least-significant bit first:
/// - bit 1: one literal byte, copied to the output and into the frame
/// - bit 0: two bytes `lo`, `hi` encode a back-reference into the frame
///   at `((hi & 0xF0) << 4) | lo` of length `(!hi & 0xF) + 3` (capped at
///   the remaining output). Copied bytes re-enter the frame as they are
///   written, so a reference may overlap its own output.
///
/// `invert` complements every output byte; the frame always stores the
/// uninverted value. The BCS container never sets it, but the scheme is
/// shared with containers that do.
///
/// The source running out before `target_len` bytes are produced is
/// [`BcsError::TruncatedStream`].
pub fn unpack<R: Read>(input: &mut R, target_len: usize, invert: bool) -> Result<Vec<u8>> {
    let mut frame = [0u8; FRAME_SIZE];
    let mut frame_pos = FRAME_INIT_POS;
    let mut output = Vec::with_capacity(target_len);
    // Sentinel: after eight right-shifts the reload marker bit reaches bit 0.
    let mut ctl: u32 = 2;

    while output.len() < target_len {
        ctl >>= 1;
        if ctl == 1 {
            let Some(byte) = read_byte(input)? else {
                return Err(truncated(target_len, &output));
            };
            ctl = u32::from(byte) | 0x100;
        }

        if ctl & 1 != 0 {
            // New literal
            let Some(byte) = read_byte(input)? else {
                return Err(truncated(target_len, &output));
            };
            frame[frame_pos & FRAME_MASK] = byte;
            frame_pos += 1;
            output.push(if invert { !byte } else { byte });
        } else {
            // Back-reference into the frame
            let Some(lo) = read_byte(input)? else {
                return Err(truncated(target_len, &output));
            };
            let Some(hi) = read_byte(input)? else {
                return Err(truncated(target_len, &output));
            };
            let mut offset = ((usize::from(hi) & 0xF0) << 4) | usize::from(lo);
            let count = (usize::from(!hi & 0x0F) + 3).min(target_len - output.len());
            for _ in 0..count {
                let byte = frame[offset & FRAME_MASK];
                offset += 1;
                frame[frame_pos & FRAME_MASK] = byte;
                frame_pos += 1;
                output.push(if invert { !byte } else { byte });
            }
        }
    }

    trace!("unpacked {} bytes", output.len());
    Ok(output)
}

fn truncated(expected: usize, output: &[u8]) -> BcsError {
    BcsError::TruncatedStream {
        expected,
        produced: output.len(),
    }
}

/// Read a single byte, mapping end-of-stream to `None`.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
