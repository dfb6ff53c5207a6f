//! Engine errors.

use core::fmt;

/// The error type for key construction and buffer operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Key material is not 16, 24 or 32 bytes long.
    InvalidKeyLength(usize),
    /// Buffer length is not a multiple of the block size.
    UnalignedBuffer(usize),
    /// A substitution table maps two inputs to the same output.
    NotPermutation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidKeyLength(len) => write!(
                f,
                "Bad key length {len}. Allowed sizes are: 16, 24, 32 bytes"
            ),
            Error::UnalignedBuffer(len) => write!(
                f,
                "Buffer length {len} is not a multiple of the 16-byte block size"
            ),
            Error::NotPermutation => write!(f, "Substitution table is not a permutation"),
        }
    }
}

impl std::error::Error for Error {}
