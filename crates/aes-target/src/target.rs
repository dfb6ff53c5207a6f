//! Key-and-plaintext target in the shape of the capture firmware.

use aes_core::{Block, CipherConfig, Context, Key, BLOCK_SIZE};

use crate::error::TargetError;

/// IV installed on every key load in the chained modes.
pub const DEFAULT_IV: Block = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];

/// Payload size processed per command in CBC and CTR modes.
pub const CHAINED_PAYLOAD: usize = 64;

/// Block mode run by the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetMode {
    /// One block per command.
    #[default]
    Ecb,
    /// 64 bytes per command, chained across commands.
    Cbc,
    /// 64 bytes per command, counter carried across commands.
    Ctr,
}

impl TargetMode {
    /// Bytes consumed and returned by one `encrypt` command.
    pub const fn payload_len(self) -> usize {
        match self {
            TargetMode::Ecb => BLOCK_SIZE,
            TargetMode::Cbc | TargetMode::Ctr => CHAINED_PAYLOAD,
        }
    }
}

/// Target configuration fixed at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetConfig {
    /// Block mode.
    pub mode: TargetMode,
    /// Engine configuration.
    pub cipher: CipherConfig,
}

/// Accepts a key, then encrypts fixed-size payloads in place.
#[derive(Clone, Debug)]
pub struct Target {
    config: TargetConfig,
    context: Option<Context>,
}

impl Target {
    /// Creates an unkeyed target.
    pub fn new(config: TargetConfig) -> Self {
        Self {
            config,
            context: None,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Size of one `encrypt` payload.
    pub fn payload_len(&self) -> usize {
        self.config.mode.payload_len()
    }

    /// Whether a key has been loaded since creation or the last reset.
    pub fn is_keyed(&self) -> bool {
        self.context.is_some()
    }

    /// Schedules `key`. The chained modes restart from [`DEFAULT_IV`].
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), TargetError> {
        let key = Key::try_from(key)?;
        self.context = Some(match self.config.mode {
            TargetMode::Ecb => Context::new(&key, &self.config.cipher),
            TargetMode::Cbc | TargetMode::Ctr => {
                Context::with_iv(&key, &DEFAULT_IV, &self.config.cipher)
            }
        });
        Ok(())
    }

    /// Encrypts `payload` in place; it must be exactly [`Self::payload_len`] bytes.
    pub fn encrypt(&mut self, payload: &mut [u8]) -> Result<(), TargetError> {
        let expected = self.payload_len();
        let ctx = self.context.as_mut().ok_or(TargetError::NoKey)?;
        if payload.len() != expected {
            return Err(TargetError::PayloadLength {
                expected,
                actual: payload.len(),
            });
        }
        match self.config.mode {
            TargetMode::Ecb => ctx.encrypt_ecb(payload)?,
            TargetMode::Cbc => ctx.encrypt_cbc(payload)?,
            TargetMode::Ctr => ctx.xcrypt_ctr(payload),
        }
        Ok(())
    }

    /// Drops the loaded key material.
    pub fn reset(&mut self) {
        self.context = None;
    }
}
