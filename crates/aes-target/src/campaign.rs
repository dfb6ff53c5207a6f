//! Fixed-key, random-text capture campaigns.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::TargetError;
use crate::target::{Target, TargetConfig};

/// One capture: what went into the target and what came back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureRecord {
    /// Key loaded for this capture.
    pub key: Vec<u8>,
    /// Payload sent.
    pub text_in: Vec<u8>,
    /// Payload returned.
    pub text_out: Vec<u8>,
}

/// Drives a [`Target`] with a fixed key and random payloads.
///
/// The key is reloaded before every capture, so each record is independent
/// of the ones before it even in the chained modes.
pub struct Campaign<R: RngCore> {
    target: Target,
    key: Vec<u8>,
    rng: R,
}

impl Campaign<ChaCha20Rng> {
    /// Campaign whose payloads are reproducible from `seed`.
    pub fn seeded(config: TargetConfig, key: &[u8], seed: u64) -> Result<Self, TargetError> {
        Self::new(config, key, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> Campaign<R> {
    /// Validates `key` against the target and prepares a campaign.
    pub fn new(config: TargetConfig, key: &[u8], rng: R) -> Result<Self, TargetError> {
        let mut target = Target::new(config);
        target.set_key(key)?;
        Ok(Self {
            target,
            key: key.to_vec(),
            rng,
        })
    }

    /// Key used by every capture.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Runs one capture with a fresh random payload.
    pub fn capture(&mut self) -> Result<CaptureRecord, TargetError> {
        let mut text_in = vec![0u8; self.target.payload_len()];
        self.rng.fill_bytes(&mut text_in);
        let mut text_out = text_in.clone();
        self.target.set_key(&self.key)?;
        self.target.encrypt(&mut text_out)?;
        Ok(CaptureRecord {
            key: self.key.clone(),
            text_in,
            text_out,
        })
    }

    /// Runs `samples` captures.
    pub fn run(&mut self, samples: usize) -> Result<Vec<CaptureRecord>, TargetError> {
        (0..samples).map(|_| self.capture()).collect()
    }
}
