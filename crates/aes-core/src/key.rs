//! Key types for AES-128, AES-192 and AES-256.

use crate::block::{Block, BLOCK_SIZE};
use crate::error::Error;

/// Largest number of rounds across all key sizes.
pub(crate) const MAX_ROUNDS: usize = 14;

/// AES key size variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 16-byte key, 10 rounds.
    Aes128,
    /// 24-byte key, 12 rounds.
    Aes192,
    /// 32-byte key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Selects the variant from a key length in bytes.
    pub fn from_len(len: usize) -> Result<Self, Error> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            other => Err(Error::InvalidKeyLength(other)),
        }
    }

    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Number of 32-bit words in the key (`Nk`).
    pub const fn words(self) -> usize {
        self.key_len() / 4
    }

    /// Number of rounds (`Nr`).
    pub const fn rounds(self) -> usize {
        self.words() + 6
    }
}

/// Raw AES key. The variant is fixed by its length.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: [u8; 32],
    size: KeySize,
}

impl Key {
    /// Key size variant.
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// The key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size.key_len()]
    }
}

impl core::fmt::Debug for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Key").field("size", &self.size).finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let size = KeySize::from_len(value.len())?;
        let mut bytes = [0u8; 32];
        bytes[..value.len()].copy_from_slice(value);
        Ok(Self { bytes, size })
    }
}

macro_rules! key_from_array {
    ($len:literal, $size:expr) => {
        impl From<[u8; $len]> for Key {
            fn from(value: [u8; $len]) -> Self {
                let mut bytes = [0u8; 32];
                bytes[..$len].copy_from_slice(&value);
                Self { bytes, size: $size }
            }
        }
    };
}

key_from_array!(16, KeySize::Aes128);
key_from_array!(24, KeySize::Aes192);
key_from_array!(32, KeySize::Aes256);

/// Expanded round keys: `rounds + 1` blocks, read-only once produced.
#[derive(Clone, PartialEq, Eq)]
pub struct RoundKeys {
    keys: [Block; MAX_ROUNDS + 1],
    rounds: usize,
}

impl RoundKeys {
    pub(crate) fn from_words(words: &[[u8; 4]], rounds: usize) -> Self {
        let mut keys = [[0u8; BLOCK_SIZE]; MAX_ROUNDS + 1];
        for (round_key, chunk) in keys.iter_mut().zip(words.chunks(4)).take(rounds + 1) {
            for (dst, word) in round_key.chunks_exact_mut(4).zip(chunk) {
                dst.copy_from_slice(word);
            }
        }
        Self { keys, rounds }
    }

    /// Returns the round key at the requested index (`0..=rounds`).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.keys[..=self.rounds][round]
    }

    /// Number of rounds these keys were expanded for.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The full schedule, `16 * (rounds + 1)` bytes.
    pub fn material(&self) -> Vec<u8> {
        self.keys[..=self.rounds].iter().flatten().copied().collect()
    }
}

impl core::fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RoundKeys")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_map_to_rounds() {
        assert_eq!(KeySize::Aes128.rounds(), 10);
        assert_eq!(KeySize::Aes192.rounds(), 12);
        assert_eq!(KeySize::Aes256.rounds(), 14);
        assert_eq!(KeySize::Aes192.words(), 6);
    }

    #[test]
    fn key_from_slice_checks_length() {
        let key = Key::try_from(&[7u8; 24][..]).unwrap();
        assert_eq!(key.size(), KeySize::Aes192);
        assert_eq!(key.as_bytes(), &[7u8; 24]);
        assert_eq!(
            Key::try_from(&[0u8; 20][..]),
            Err(Error::InvalidKeyLength(20))
        );
        assert_eq!(Key::try_from(&[][..]), Err(Error::InvalidKeyLength(0)));
    }

    #[test]
    fn debug_output_hides_key_bytes() {
        let key = Key::from([0xabu8; 16]);
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("171"));
        assert!(rendered.contains("Aes128"));
    }
}
