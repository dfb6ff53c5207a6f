//! Block representation helpers.

use crate::error::Error;

/// Size of an AES block in bytes, for every key size.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, stored column by column.
pub type Block = [u8; BLOCK_SIZE];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Splits `buf` into whole blocks, rejecting trailing bytes.
pub(crate) fn blocks_mut(buf: &mut [u8]) -> Result<impl Iterator<Item = &mut Block>, Error> {
    if buf.len() % BLOCK_SIZE != 0 {
        return Err(Error::UnalignedBuffer(buf.len()));
    }
    Ok(buf
        .chunks_exact_mut(BLOCK_SIZE)
        .filter_map(|chunk| <&mut Block>::try_from(chunk).ok()))
}
