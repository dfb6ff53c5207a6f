//! AES round transformations over a column-major 4×4 state.

use crate::block::{xor_in_place, Block};
use crate::sbox::SboxTable;

/// Replaces every byte of the state with its image under `table`.
#[inline]
pub fn sub_bytes(state: &mut Block, table: &SboxTable) {
    for byte in state.iter_mut() {
        *byte = table.sub(*byte);
    }
}

/// Replaces every byte of the state with its preimage under `table`.
#[inline]
pub fn inv_sub_bytes(state: &mut Block, table: &SboxTable) {
    for byte in state.iter_mut() {
        *byte = table.inv_sub(*byte);
    }
}

/// Rotates row `r` left by `r` positions.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let src = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[col * 4 + row] = src[((col + row) % 4) * 4 + row];
        }
    }
}

/// Rotates row `r` right by `r` positions.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    let src = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[((col + row) % 4) * 4 + row] = src[col * 4 + row];
        }
    }
}

/// Multiplies by `x` in GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.
#[inline]
pub fn xtime(byte: u8) -> u8 {
    (byte << 1) ^ if byte & 0x80 != 0 { 0x1b } else { 0x00 }
}

/// GF(2^8) product of `byte` and a constant of at most five bits.
///
/// Every MixColumns constant (`0x01..=0x0e`) fits, so doubling four times is
/// enough.
#[inline]
pub fn multiply(byte: u8, constant: u8) -> u8 {
    let mut product = 0u8;
    let mut power = byte;
    for bit in 0..5 {
        if (constant >> bit) & 1 != 0 {
            product ^= power;
        }
        power = xtime(power);
    }
    product
}

fn mix_single_column(col: &mut [u8]) {
    let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
    let all = a0 ^ a1 ^ a2 ^ a3;
    col[0] ^= all ^ xtime(a0 ^ a1);
    col[1] ^= all ^ xtime(a1 ^ a2);
    col[2] ^= all ^ xtime(a2 ^ a3);
    col[3] ^= all ^ xtime(a3 ^ a0);
}

fn inv_mix_single_column(col: &mut [u8]) {
    let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
    col[0] = multiply(a0, 0x0e) ^ multiply(a1, 0x0b) ^ multiply(a2, 0x0d) ^ multiply(a3, 0x09);
    col[1] = multiply(a0, 0x09) ^ multiply(a1, 0x0e) ^ multiply(a2, 0x0b) ^ multiply(a3, 0x0d);
    col[2] = multiply(a0, 0x0d) ^ multiply(a1, 0x09) ^ multiply(a2, 0x0e) ^ multiply(a3, 0x0b);
    col[3] = multiply(a0, 0x0b) ^ multiply(a1, 0x0d) ^ multiply(a2, 0x09) ^ multiply(a3, 0x0e);
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        mix_single_column(column);
    }
}

/// Inverse MixColumns over all four columns.
#[inline]
pub fn inv_mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        inv_mix_single_column(column);
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}
