//! Portable AES engine with configurable substitution tables.
//!
//! This crate provides:
//! - AES-128, AES-192 and AES-256 key schedules.
//! - Single-block encryption and decryption.
//! - ECB, CBC and CTR drivers over whole buffers ([`Context`]).
//! - The standard S-box plus the experimental and alternate permutations used
//!   for side-channel comparisons, and alternate round constructions built
//!   from them ([`Construction`]).
//!
//! Nothing here pads, authenticates or manages keys. The implementation aims
//! for clarity and testability rather than constant-time guarantees; it should
//! not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
mod key;
mod modes;
pub mod round;
mod sbox;

pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{expand_key, Aes, CipherConfig, Construction};
pub use crate::error::Error;
pub use crate::key::{Key, KeySize, RoundKeys};
pub use crate::modes::{increment_counter, Context};
pub use crate::sbox::SboxTable;
