//! Capture-target glue for the `aes-core` engine.
//!
//! The target mirrors what side-channel capture firmware does around the
//! cipher: load a 16/24/32-byte key, take a plaintext payload, hand back
//! whatever the engine produced. ECB handles one block per command; CBC and
//! CTR handle a 64-byte payload starting from a fixed `00 01 .. 0f` IV.
//!
//! Captured records feed a simulated Hamming-weight leakage model, and the
//! CPA and DPA attacks measure how many traces a table needs before its
//! first-round key falls.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod attack;
mod campaign;
mod error;
mod leakage;
mod target;

pub use attack::{assessment_rng, cpa_recover, dpa_recover, Assessment, Attack};
pub use campaign::{Campaign, CaptureRecord};
pub use error::TargetError;
pub use leakage::{first_block_input, leakage_table, Gaussian, LeakageModel, TraceSet};
pub use target::{Target, TargetConfig, TargetMode, CHAINED_PAYLOAD, DEFAULT_IV};
