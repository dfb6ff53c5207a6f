//! Key schedule and block encryption/decryption for all key sizes.

use crate::block::Block;
use crate::key::{Key, RoundKeys, MAX_ROUNDS};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::SboxTable;

/// Round constants; index 0 is never used.
const RCON: [u8; 11] = [
    0x8d, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36,
];

fn sub_word(word: [u8; 4], sbox: &SboxTable) -> [u8; 4] {
    word.map(|byte| sbox.sub(byte))
}

/// Expands `key` into `rounds + 1` round keys, substituting through `sbox`.
pub fn expand_key(key: &Key, sbox: &SboxTable) -> RoundKeys {
    let size = key.size();
    let nk = size.words();
    let total = 4 * (size.rounds() + 1);

    let mut w = [[0u8; 4]; 4 * (MAX_ROUNDS + 1)];
    for (word, chunk) in w.iter_mut().zip(key.as_bytes().chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }

    for i in nk..total {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp.rotate_left(1);
            temp = sub_word(temp, sbox);
            temp[0] ^= RCON[i / nk];
        } else if nk == 8 && i % nk == 4 {
            temp = sub_word(temp, sbox);
        }
        let prev = w[i - nk];
        w[i] = core::array::from_fn(|j| prev[j] ^ temp[j]);
    }

    RoundKeys::from_words(&w[..total], size.rounds())
}

/// The diffusion step applied between ShiftRows and AddRoundKey in every
/// round but the last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MixLayer {
    Columns,
    Substitution(SboxTable),
}

impl MixLayer {
    #[inline]
    fn forward(&self, state: &mut Block) {
        match self {
            MixLayer::Columns => mix_columns(state),
            MixLayer::Substitution(table) => sub_bytes(state, table),
        }
    }

    #[inline]
    fn inverse(&self, state: &mut Block) {
        match self {
            MixLayer::Columns => inv_mix_columns(state),
            MixLayer::Substitution(table) => inv_sub_bytes(state, table),
        }
    }
}

/// Round construction built around the main substitution table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Construction {
    /// FIPS-197 rounds: SubBytes, ShiftRows, MixColumns, AddRoundKey.
    #[default]
    Standard,
    /// MixColumns replaced by a substitution through the given table.
    ///
    /// Not AES. Kept for side-channel comparisons.
    AlternateMix(SboxTable),
    /// SubBytes substitutes through the main table and then the given table;
    /// MixColumns is kept. The key schedule only sees the main table.
    ComposedSubstitution(SboxTable),
}

/// Engine configuration chosen at construction time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CipherConfig {
    /// Main substitution table, also used by the key schedule.
    pub sbox: SboxTable,
    /// Round construction.
    pub construction: Construction,
}

impl CipherConfig {
    /// Standard construction over the given table.
    pub fn with_sbox(sbox: SboxTable) -> Self {
        Self {
            sbox,
            construction: Construction::Standard,
        }
    }
}

/// A keyed block cipher. Immutable once built and cheap to share by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aes {
    round_keys: RoundKeys,
    sub_layer: SboxTable,
    mix_layer: MixLayer,
}

impl Aes {
    /// Schedules `key` under `config`.
    pub fn new(key: &Key, config: &CipherConfig) -> Self {
        let round_keys = expand_key(key, &config.sbox);
        let (sub_layer, mix_layer) = match config.construction {
            Construction::Standard => (config.sbox, MixLayer::Columns),
            Construction::AlternateMix(alt) => (config.sbox, MixLayer::Substitution(alt)),
            Construction::ComposedSubstitution(alt) => {
                (SboxTable::compose(&config.sbox, &alt), MixLayer::Columns)
            }
        };
        Self {
            round_keys,
            sub_layer,
            mix_layer,
        }
    }

    /// Expanded round keys.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }

    /// Encrypts a single 16-byte block in place.
    pub fn encrypt_block(&self, state: &mut Block) {
        let rounds = self.round_keys.rounds();

        add_round_key(state, self.round_keys.get(0));
        for round in 1..rounds {
            sub_bytes(state, &self.sub_layer);
            shift_rows(state);
            self.mix_layer.forward(state);
            add_round_key(state, self.round_keys.get(round));
        }

        sub_bytes(state, &self.sub_layer);
        shift_rows(state);
        add_round_key(state, self.round_keys.get(rounds));
    }

    /// Decrypts a single 16-byte block in place.
    pub fn decrypt_block(&self, state: &mut Block) {
        let rounds = self.round_keys.rounds();

        add_round_key(state, self.round_keys.get(rounds));
        for round in (1..rounds).rev() {
            inv_shift_rows(state);
            inv_sub_bytes(state, &self.sub_layer);
            add_round_key(state, self.round_keys.get(round));
            self.mix_layer.inverse(state);
        }
        inv_shift_rows(state);
        inv_sub_bytes(state, &self.sub_layer);
        add_round_key(state, self.round_keys.get(0));
    }
}
