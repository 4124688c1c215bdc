//! String-table decryption for the BCS container

use blowfish::cipher::generic_array::GenericArray;
use blowfish::cipher::{BlockDecrypt, KeyInit};
use blowfish::Blowfish;
use log::trace;
use super::error::{Result, BcsError};

/// Fixed ASCII key protecting the TNK string table.
pub const TNK_KEY: &[u8] = b"TLibDefKey";

/// Blowfish block width; decryption never touches a partial block.
pub const BLOCK_SIZE: usize = 8;

/// Decrypt the string table body in place with the container's fixed key.
///
/// Only the largest multiple-of-8 prefix is transformed; a trailing 1-7
/// bytes stay as they were stored. Records must never resolve into the
/// unaligned tail as if it had been decrypted.
pub fn decrypt_tnk_body(body: &mut [u8]) -> Result<()> {
    decrypt_in_place(body, TNK_KEY)
}

/// Decrypt the aligned prefix of `data` in place, keyed with `key`.
pub fn decrypt_in_place(data: &mut [u8], key: &[u8]) -> Result<()> {
    let aligned_len = data.len() & !(BLOCK_SIZE - 1);
    trace!("decrypting {} of {} bytes", aligned_len, data.len());

    let cipher: Blowfish =
        Blowfish::new_from_slice(key).map_err(|e| BcsError::Decrypt(e.to_string()))?;
    for block in data[..aligned_len].chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    Ok(())
}
