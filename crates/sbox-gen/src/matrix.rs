//! 8×8 matrices over GF(2).

use rand::{CryptoRng, RngCore};

/// 8×8 binary matrix, one packed `u8` per row (bit `c` of row `r` is entry `(r, c)`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Matrix8 {
    rows: [u8; 8],
}

impl Matrix8 {
    /// Builds a matrix from packed rows.
    pub const fn from_rows(rows: [u8; 8]) -> Self {
        Self { rows }
    }

    /// Returns the identity matrix.
    pub fn identity() -> Self {
        Self::from_rows(core::array::from_fn(|i| 1u8 << i))
    }

    /// Draws random matrices until an invertible one comes up.
    ///
    /// Roughly 29% of 8×8 binary matrices are invertible, so a handful of
    /// draws is typical.
    pub fn random_invertible<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut rows = [0u8; 8];
            rng.fill_bytes(&mut rows);
            let candidate = Self::from_rows(rows);
            if candidate.rank() == 8 {
                return candidate;
            }
        }
    }

    /// Applies the matrix to a byte seen as a column vector of bits.
    pub fn apply(&self, value: u8) -> u8 {
        self.rows
            .iter()
            .enumerate()
            .fold(0u8, |acc, (r, row)| acc | (((row & value).count_ones() & 1) as u8) << r)
    }

    /// Matrix product `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        let rows = self.rows.map(|row| {
            (0..8)
                .filter(|bit| (row >> bit) & 1 == 1)
                .fold(0u8, |acc, bit| acc ^ rhs.rows[bit])
        });
        Self::from_rows(rows)
    }

    /// Rank over GF(2).
    pub fn rank(&self) -> u32 {
        let mut rows = self.rows;
        let mut rank = 0;
        for col in 0..8 {
            let Some(pivot) = (rank as usize..8).find(|&r| (rows[r] >> col) & 1 == 1) else {
                continue;
            };
            rows.swap(pivot, rank as usize);
            for r in 0..8 {
                if r != rank as usize && (rows[r] >> col) & 1 == 1 {
                    rows[r] ^= rows[rank as usize];
                }
            }
            rank += 1;
        }
        rank
    }

    /// Inverse via Gauss-Jordan elimination, or `None` if singular.
    pub fn invert(&self) -> Option<Self> {
        let mut left = self.rows;
        let mut right = Self::identity().rows;

        for col in 0..8 {
            let pivot = (col..8).find(|&r| (left[r] >> col) & 1 == 1)?;
            left.swap(pivot, col);
            right.swap(pivot, col);
            for row in 0..8 {
                if row != col && (left[row] >> col) & 1 == 1 {
                    left[row] ^= left[col];
                    right[row] ^= right[col];
                }
            }
        }

        Some(Self::from_rows(right))
    }
}
