//! Simulated power traces under a Hamming-weight leakage model.
//!
//! Each trace has one sample per state byte of the first round: the Hamming
//! weight of the substitution output `table[input ^ key]` plus Gaussian
//! noise. `input` is the block the cipher actually sees, so CBC whitens the
//! payload with the IV and CTR only ever leaks the fixed counter.

use core::f64::consts::PI;

use aes_core::{xor_in_place, Block, CipherConfig, Construction, Error, SboxTable, BLOCK_SIZE};
use rand::distributions::Distribution;
use rand::Rng;

use crate::campaign::CaptureRecord;
use crate::error::TargetError;
use crate::target::{TargetMode, DEFAULT_IV};

/// Table whose output leaks in the first round of `config`.
pub fn leakage_table(config: &CipherConfig) -> SboxTable {
    match config.construction {
        Construction::ComposedSubstitution(then) => SboxTable::compose(&config.sbox, &then),
        Construction::Standard | Construction::AlternateMix(_) => config.sbox,
    }
}

/// First cipher input for a payload sent to a freshly keyed target.
pub fn first_block_input(mode: TargetMode, text_in: &[u8]) -> Result<Block, TargetError> {
    let head = text_in
        .get(..BLOCK_SIZE)
        .ok_or(TargetError::PayloadLength {
            expected: BLOCK_SIZE,
            actual: text_in.len(),
        })?;
    let mut block = DEFAULT_IV;
    match mode {
        TargetMode::Ecb => block.copy_from_slice(head),
        TargetMode::Cbc => {
            let mut first = [0u8; BLOCK_SIZE];
            first.copy_from_slice(head);
            xor_in_place(&mut block, &first);
        }
        TargetMode::Ctr => {}
    }
    Ok(block)
}

/// Zero-mean normal distribution, sampled with the Box-Muller transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gaussian {
    sigma: f64,
}

impl Gaussian {
    /// Distribution with standard deviation `sigma` (negative values are taken as 0).
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma: sigma.max(0.0),
        }
    }

    /// Standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution<f64> for Gaussian {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.sigma == 0.0 {
            return 0.0;
        }
        // u1 in (0, 1] keeps the logarithm finite.
        let u1 = 1.0 - rng.gen::<f64>();
        let u2 = rng.gen::<f64>();
        self.sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// Hamming-weight leakage of a substitution table.
#[derive(Clone, Debug, PartialEq)]
pub struct LeakageModel {
    table: [u8; 256],
    noise: Gaussian,
}

impl LeakageModel {
    /// Model leaking `table` outputs with noise of deviation `sigma`.
    pub fn new(table: [u8; 256], sigma: f64) -> Self {
        Self {
            table,
            noise: Gaussian::new(sigma),
        }
    }

    /// Model for the first round of `config`.
    pub fn for_cipher(config: &CipherConfig, sigma: f64) -> Self {
        Self::new(*leakage_table(config).forward(), sigma)
    }

    /// Table the model leaks through.
    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    /// Noise distribution added to every sample.
    pub fn noise(&self) -> Gaussian {
        self.noise
    }

    /// One sample per state byte for the given cipher input and first round key.
    pub fn trace<R: Rng + ?Sized>(&self, input: &Block, round_key: &Block, rng: &mut R) -> Vec<f64> {
        input
            .iter()
            .zip(round_key)
            .map(|(&x, &k)| {
                f64::from(self.table[(x ^ k) as usize].count_ones()) + self.noise.sample(rng)
            })
            .collect()
    }
}

/// Known cipher inputs paired with their traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceSet {
    /// First cipher input of each capture.
    pub inputs: Vec<Block>,
    /// One trace per input.
    pub traces: Vec<Vec<f64>>,
}

impl TraceSet {
    /// Number of captures.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the set holds no captures.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Adds one capture.
    pub fn push(&mut self, input: Block, trace: Vec<f64>) {
        self.inputs.push(input);
        self.traces.push(trace);
    }

    /// Simulates a trace for every record as captured from a target in `mode`.
    pub fn simulate<R: Rng + ?Sized>(
        records: &[CaptureRecord],
        mode: TargetMode,
        model: &LeakageModel,
        rng: &mut R,
    ) -> Result<Self, TargetError> {
        let mut set = Self::default();
        for record in records {
            let input = first_block_input(mode, &record.text_in)?;
            let round_key: Block = record
                .key
                .get(..BLOCK_SIZE)
                .and_then(|head| head.try_into().ok())
                .ok_or(Error::InvalidKeyLength(record.key.len()))?;
            let trace = model.trace(&input, &round_key, rng);
            set.push(input, trace);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Campaign;
    use crate::target::TargetConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn composed_construction_leaks_through_both_tables() {
        let config = CipherConfig {
            sbox: SboxTable::EXPERIMENTAL,
            construction: Construction::ComposedSubstitution(SboxTable::ALTERNATE),
        };
        let table = leakage_table(&config);
        for x in 0..=255u8 {
            assert_eq!(table.sub(x), SboxTable::ALTERNATE.sub(SboxTable::EXPERIMENTAL.sub(x)));
        }
        let alt_mix = CipherConfig {
            construction: Construction::AlternateMix(SboxTable::ALTERNATE),
            ..config
        };
        assert_eq!(leakage_table(&alt_mix), SboxTable::EXPERIMENTAL);
    }

    #[test]
    fn first_input_follows_mode() {
        let payload: Vec<u8> = (0x10..0x50).collect();
        let ecb = first_block_input(TargetMode::Ecb, &payload).unwrap();
        assert_eq!(ecb[..], payload[..16]);

        let cbc = first_block_input(TargetMode::Cbc, &payload).unwrap();
        for (i, byte) in cbc.iter().enumerate() {
            assert_eq!(*byte, payload[i] ^ DEFAULT_IV[i]);
        }

        assert_eq!(first_block_input(TargetMode::Ctr, &payload).unwrap(), DEFAULT_IV);
        assert_eq!(
            first_block_input(TargetMode::Ecb, &payload[..5]),
            Err(TargetError::PayloadLength {
                expected: 16,
                actual: 5
            })
        );
    }

    #[test]
    fn noiseless_trace_is_hamming_weight() {
        let model = LeakageModel::new(*SboxTable::STANDARD.forward(), 0.0);
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        let input: Block = core::array::from_fn(|i| i as u8);
        let trace = model.trace(&input, &[0u8; 16], &mut rng);
        // 0x63, 0x7c, 0x77, 0x7b for inputs 0..4
        assert_eq!(trace[..4], [4.0, 5.0, 6.0, 6.0]);
        assert_eq!(trace.len(), 16);
    }

    #[test]
    fn gaussian_has_requested_moments() {
        let noise = Gaussian::new(2.0);
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let samples: Vec<f64> = (0..20_000).map(|_| noise.sample(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert!((var - 4.0).abs() < 0.3, "variance {var}");
        assert_eq!(Gaussian::new(-1.0).sample(&mut rng), 0.0);
    }

    #[test]
    fn simulated_set_pairs_inputs_and_traces() {
        let config = TargetConfig {
            mode: TargetMode::Cbc,
            cipher: CipherConfig::default(),
        };
        let records = Campaign::seeded(config, &[3u8; 32], 9).unwrap().run(5).unwrap();
        let model = LeakageModel::for_cipher(&config.cipher, 0.0);
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        let set = TraceSet::simulate(&records, config.mode, &model, &mut rng).unwrap();
        assert_eq!(set.len(), 5);
        for (record, (input, trace)) in records.iter().zip(set.inputs.iter().zip(&set.traces)) {
            assert_eq!(*input, first_block_input(TargetMode::Cbc, &record.text_in).unwrap());
            let expected = SboxTable::STANDARD.sub(input[0] ^ 3).count_ones();
            assert_eq!(trace[0], f64::from(expected));
        }
    }
}
