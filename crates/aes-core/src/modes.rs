//! ECB, CBC and CTR drivers over a keyed engine.
//!
//! A [`Context`] owns the round keys and one chaining value (the CBC IV or the
//! CTR counter). The chaining value is updated after every call, so a long
//! message can be processed in several calls as long as the caller keeps the
//! blocks in order. Contexts do no internal locking; give each stream its own.
//!
//! IV and counter uniqueness is the caller's responsibility: nothing here
//! detects a counter reused under the same key.

use crate::block::{blocks_mut, xor_in_place, Block, BLOCK_SIZE};
use crate::cipher::{Aes, CipherConfig};
use crate::error::Error;
use crate::key::Key;

/// Round keys plus a chaining value.
#[derive(Clone, Debug)]
pub struct Context {
    cipher: Aes,
    iv: Block,
}

impl Context {
    /// Schedules `key` with an all-zero chaining value.
    pub fn new(key: &Key, config: &CipherConfig) -> Self {
        Self::with_iv(key, &[0u8; BLOCK_SIZE], config)
    }

    /// Schedules `key` and installs `iv` as the chaining value.
    pub fn with_iv(key: &Key, iv: &Block, config: &CipherConfig) -> Self {
        Self {
            cipher: Aes::new(key, config),
            iv: *iv,
        }
    }

    /// Replaces the chaining value, keeping the key.
    pub fn set_iv(&mut self, iv: &Block) {
        self.iv = *iv;
    }

    /// Current chaining value.
    pub fn iv(&self) -> &Block {
        &self.iv
    }

    /// The keyed engine.
    pub fn cipher(&self) -> &Aes {
        &self.cipher
    }

    /// Encrypts one block in place with no chaining.
    pub fn encrypt_block_ecb(&self, block: &mut Block) {
        self.cipher.encrypt_block(block);
    }

    /// Decrypts one block in place with no chaining.
    pub fn decrypt_block_ecb(&self, block: &mut Block) {
        self.cipher.decrypt_block(block);
    }

    /// Encrypts every block of `buf` independently.
    pub fn encrypt_ecb(&self, buf: &mut [u8]) -> Result<(), Error> {
        for block in blocks_mut(buf)? {
            self.cipher.encrypt_block(block);
        }
        Ok(())
    }

    /// Decrypts every block of `buf` independently.
    pub fn decrypt_ecb(&self, buf: &mut [u8]) -> Result<(), Error> {
        for block in blocks_mut(buf)? {
            self.cipher.decrypt_block(block);
        }
        Ok(())
    }

    /// CBC-encrypts `buf` in place, leaving the last ciphertext block as the
    /// chaining value.
    pub fn encrypt_cbc(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let mut chain = self.iv;
        for block in blocks_mut(buf)? {
            xor_in_place(block, &chain);
            self.cipher.encrypt_block(block);
            chain = *block;
        }
        self.iv = chain;
        Ok(())
    }

    /// CBC-decrypts `buf` in place, leaving the last ciphertext block as the
    /// chaining value.
    pub fn decrypt_cbc(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let mut chain = self.iv;
        for block in blocks_mut(buf)? {
            let ciphertext = *block;
            self.cipher.decrypt_block(block);
            xor_in_place(block, &chain);
            chain = ciphertext;
        }
        self.iv = chain;
        Ok(())
    }

    /// CTR-mode transform; encryption and decryption are the same call.
    ///
    /// Each call starts from a fresh keystream block. A trailing partial block
    /// still consumes one counter value, so only the final call of a stream
    /// may have a length that is not a multiple of 16.
    pub fn xcrypt_ctr(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(BLOCK_SIZE) {
            let mut keystream = self.iv;
            self.cipher.encrypt_block(&mut keystream);
            increment_counter(&mut self.iv);
            for (byte, key) in chunk.iter_mut().zip(keystream.iter()) {
                *byte ^= key;
            }
        }
    }
}

/// Adds one to `counter` as a 128-bit big-endian integer, wrapping to zero.
pub fn increment_counter(counter: &mut Block) {
    for byte in counter.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::Construction;
    use crate::sbox::SboxTable;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const FIRMWARE_IV: Block = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];

    fn random_key(rng: &mut ChaCha20Rng) -> Key {
        let len = [16usize, 24, 32][rng.gen_range(0..3)];
        let mut bytes = vec![0u8; len];
        rng.fill_bytes(&mut bytes);
        Key::try_from(&bytes[..]).unwrap()
    }

    fn random_buffer(rng: &mut ChaCha20Rng, blocks: usize) -> Vec<u8> {
        let mut buf = vec![0u8; blocks * BLOCK_SIZE];
        rng.fill_bytes(&mut buf);
        buf
    }

    #[test]
    fn counter_increments_big_endian() {
        let mut counter = [0u8; 16];
        increment_counter(&mut counter);
        assert_eq!(counter[15], 1);

        let mut counter = [0u8; 16];
        counter[15] = 0xff;
        counter[14] = 0xff;
        increment_counter(&mut counter);
        assert_eq!(&counter[13..], &[0x01, 0x00, 0x00]);
    }

    #[test]
    fn counter_wraps_to_zero() {
        let mut counter = [0xffu8; 16];
        increment_counter(&mut counter);
        assert_eq!(counter, [0u8; 16]);
    }

    #[test]
    fn ecb_round_trip_and_determinism() {
        let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
        for _ in 0..16 {
            let ctx = Context::new(&random_key(&mut rng), &CipherConfig::default());
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut block);
            let mut buf = [block, block, block].concat();
            let original = buf.clone();
            ctx.encrypt_ecb(&mut buf).unwrap();
            assert_eq!(buf[..16], buf[16..32]);
            assert_eq!(buf[16..32], buf[32..]);

            let mut single = block;
            ctx.encrypt_block_ecb(&mut single);
            assert_eq!(single[..], buf[..16]);

            ctx.decrypt_ecb(&mut buf).unwrap();
            assert_eq!(buf, original);
        }
    }

    #[test]
    fn cbc_round_trip_random() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        for blocks in 0..8 {
            let key = random_key(&mut rng);
            let config = CipherConfig::with_sbox(SboxTable::EXPERIMENTAL);
            let original = random_buffer(&mut rng, blocks);
            let mut buf = original.clone();

            let mut enc = Context::with_iv(&key, &FIRMWARE_IV, &config);
            enc.encrypt_cbc(&mut buf).unwrap();
            let mut dec = Context::with_iv(&key, &FIRMWARE_IV, &config);
            dec.decrypt_cbc(&mut buf).unwrap();
            assert_eq!(buf, original);
            assert_eq!(enc.iv(), dec.iv());
        }
    }

    #[test]
    fn cbc_identical_blocks_differ() {
        let ctx_key = Key::from([0x42u8; 16]);
        let mut ctx = Context::with_iv(&ctx_key, &FIRMWARE_IV, &CipherConfig::default());
        let mut buf = [0x11u8; 32];
        ctx.encrypt_cbc(&mut buf).unwrap();
        assert_ne!(buf[..16], buf[16..]);
        assert_eq!(ctx.iv()[..], buf[16..]);
    }

    #[test]
    fn cbc_split_calls_match_single_call() {
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        let key = random_key(&mut rng);
        let original = random_buffer(&mut rng, 6);

        let mut whole = original.clone();
        let mut ctx = Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default());
        ctx.encrypt_cbc(&mut whole).unwrap();

        let mut pieces = original.clone();
        let mut ctx = Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default());
        let (head, tail) = pieces.split_at_mut(32);
        ctx.encrypt_cbc(head).unwrap();
        ctx.encrypt_cbc(tail).unwrap();
        assert_eq!(pieces, whole);

        let mut ctx = Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default());
        let (head, tail) = pieces.split_at_mut(48);
        ctx.decrypt_cbc(head).unwrap();
        ctx.decrypt_cbc(tail).unwrap();
        assert_eq!(pieces, original);
    }

    #[test]
    fn cbc_corruption_stays_within_two_blocks() {
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let key = random_key(&mut rng);
        let original = random_buffer(&mut rng, 6);
        let mut ciphertext = original.clone();
        Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default())
            .encrypt_cbc(&mut ciphertext)
            .unwrap();

        for corrupted in 0..6 {
            let mut buf = ciphertext.clone();
            buf[corrupted * 16 + 3] ^= 0x80;
            Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default())
                .decrypt_cbc(&mut buf)
                .unwrap();
            for block in 0..6 {
                let range = block * 16..block * 16 + 16;
                let intact = buf[range.clone()] == original[range];
                let affected = block == corrupted || block == corrupted + 1;
                assert_eq!(intact, !affected, "corrupted {corrupted}, block {block}");
            }
        }
    }

    #[test]
    fn unaligned_buffers_are_rejected_untouched() {
        let key = Key::from([1u8; 16]);
        let mut ctx = Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default());
        let mut buf = [0x5au8; 20];
        assert_eq!(ctx.encrypt_cbc(&mut buf), Err(Error::UnalignedBuffer(20)));
        assert_eq!(ctx.decrypt_cbc(&mut buf), Err(Error::UnalignedBuffer(20)));
        assert_eq!(ctx.encrypt_ecb(&mut buf), Err(Error::UnalignedBuffer(20)));
        assert_eq!(ctx.decrypt_ecb(&mut buf), Err(Error::UnalignedBuffer(20)));
        assert_eq!(buf, [0x5au8; 20]);
        assert_eq!(ctx.iv(), &FIRMWARE_IV);
    }

    #[test]
    fn ctr_is_an_involution() {
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        let config = CipherConfig {
            sbox: SboxTable::EXPERIMENTAL,
            construction: Construction::AlternateMix(SboxTable::ALTERNATE),
        };
        for len in [0usize, 1, 15, 16, 17, 64, 100] {
            let key = random_key(&mut rng);
            let mut iv = [0u8; 16];
            rng.fill_bytes(&mut iv);
            let mut original = vec![0u8; len];
            rng.fill_bytes(&mut original);

            let mut buf = original.clone();
            Context::with_iv(&key, &iv, &config).xcrypt_ctr(&mut buf);
            if len >= BLOCK_SIZE {
                assert_ne!(buf, original);
            }
            Context::with_iv(&key, &iv, &config).xcrypt_ctr(&mut buf);
            assert_eq!(buf, original);
        }
    }

    #[test]
    fn ctr_advances_counter_per_block() {
        let key = Key::from([9u8; 16]);
        let mut ctx = Context::with_iv(&key, &[0xffu8; 16], &CipherConfig::default());
        let mut buf = [0u8; 48];
        ctx.xcrypt_ctr(&mut buf);
        let mut expected = [0u8; 16];
        expected[15] = 2;
        assert_eq!(ctx.iv(), &expected);

        // Block 1 of the keystream is E(0), block 2 is E(1).
        let mut zero = [0u8; 16];
        ctx.encrypt_block_ecb(&mut zero);
        assert_eq!(buf[16..32], zero[..]);
    }

    #[test]
    fn set_iv_restarts_stream() {
        let key = Key::from([3u8; 32]);
        let mut ctx = Context::with_iv(&key, &FIRMWARE_IV, &CipherConfig::default());
        let mut first = [0u8; 64];
        ctx.xcrypt_ctr(&mut first);
        ctx.set_iv(&FIRMWARE_IV);
        let mut second = [0u8; 64];
        ctx.xcrypt_ctr(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn firmware_payloads_with_experimental_table() {
        let key = Key::from([
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ]);
        let config = CipherConfig::with_sbox(SboxTable::EXPERIMENTAL);
        let plain: [u8; 64] = core::array::from_fn(|i| i as u8);

        let mut buf = plain;
        Context::with_iv(&key, &FIRMWARE_IV, &config)
            .encrypt_cbc(&mut buf)
            .unwrap();
        assert_eq!(
            hex::encode(buf),
            "2159c6e993a7ce3d6a2baf602eaafa2bcf01fcb96ecce10f4ddee6382943a932\
             84ab635fd1aa689f8e73f1e91927df9e5ea1ec77c80a69341797117f21fbe7ad"
        );

        let mut buf = plain;
        Context::with_iv(&key, &FIRMWARE_IV, &config).xcrypt_ctr(&mut buf);
        assert_eq!(
            hex::encode(buf),
            "450bc30e1526fed21ef49be515409dfe36b0aa50dd49692a7eab0548520dbb0f\
             0593f4fb0d7f2aebc8c0c162d1fb2d090280164607a3a4c2f3b7bc4b58e4b5a2"
        );
    }
}
