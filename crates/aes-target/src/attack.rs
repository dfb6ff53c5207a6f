//! First-round key recovery and the traces-to-break figure of merit.
//!
//! Both attacks rank the 256 guesses for each key byte against the
//! hypothesis `table[input ^ guess]` and keep the best one.

use aes_core::Block;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::campaign::Campaign;
use crate::error::TargetError;
use crate::leakage::{LeakageModel, TraceSet};
use crate::target::TargetConfig;

/// Key-recovery technique.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Attack {
    /// Correlation power analysis on the Hamming weight of the hypothesis.
    #[default]
    Cpa,
    /// Difference of means on bit 0 of the hypothesis.
    Dpa,
}

impl Attack {
    /// Best first-round key guess for `set`.
    pub fn recover(self, table: &[u8; 256], set: &TraceSet) -> Block {
        match self {
            Attack::Cpa => cpa_recover(table, set),
            Attack::Dpa => dpa_recover(table, set),
        }
    }
}

/// Correlation power analysis: per byte, the guess whose Hamming-weight
/// hypothesis has the largest absolute Pearson correlation with any sample.
pub fn cpa_recover(table: &[u8; 256], set: &TraceSet) -> Block {
    let stats = SampleStats::new(&set.traces);
    core::array::from_fn(|byte| {
        best_guess(|guess| {
            let hypotheses: Vec<f64> = set
                .inputs
                .iter()
                .map(|input| f64::from(table[(input[byte] ^ guess) as usize].count_ones()))
                .collect();
            stats.peak_correlation(&set.traces, &hypotheses)
        })
    })
}

/// Differential power analysis: per byte, the guess whose bit-0 partition
/// gives the largest difference of mean traces.
pub fn dpa_recover(table: &[u8; 256], set: &TraceSet) -> Block {
    let width = trace_width(&set.traces);
    core::array::from_fn(|byte| {
        best_guess(|guess| {
            let mut ones = vec![0.0; width];
            let mut zeros = vec![0.0; width];
            let (mut n_ones, mut n_zeros) = (0usize, 0usize);
            for (input, trace) in set.inputs.iter().zip(&set.traces) {
                let (sums, count) = if table[(input[byte] ^ guess) as usize] & 1 == 1 {
                    (&mut ones, &mut n_ones)
                } else {
                    (&mut zeros, &mut n_zeros)
                };
                *count += 1;
                for (sum, sample) in sums.iter_mut().zip(trace) {
                    *sum += sample;
                }
            }
            if n_ones == 0 || n_zeros == 0 {
                return 0.0;
            }
            ones.iter()
                .zip(&zeros)
                .map(|(one, zero)| (one / n_ones as f64 - zero / n_zeros as f64).abs())
                .fold(0.0, f64::max)
        })
    })
}

/// Smallest guess with the strictly largest score.
fn best_guess(mut score: impl FnMut(u8) -> f64) -> u8 {
    let mut best = (0u8, f64::NEG_INFINITY);
    for guess in 0..=255u8 {
        let value = score(guess);
        if value > best.1 {
            best = (guess, value);
        }
    }
    best.0
}

fn trace_width(traces: &[Vec<f64>]) -> usize {
    traces.iter().map(Vec::len).min().unwrap_or(0)
}

/// Per-sample means and root sums of squared deviations.
struct SampleStats {
    means: Vec<f64>,
    deviations: Vec<f64>,
}

impl SampleStats {
    fn new(traces: &[Vec<f64>]) -> Self {
        let width = trace_width(traces);
        let n = traces.len().max(1) as f64;
        let means: Vec<f64> = (0..width)
            .map(|j| traces.iter().map(|t| t[j]).sum::<f64>() / n)
            .collect();
        let deviations = (0..width)
            .map(|j| {
                traces
                    .iter()
                    .map(|t| (t[j] - means[j]).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();
        Self { means, deviations }
    }

    /// Largest absolute correlation between `hypotheses` and any sample.
    /// Constant columns and constant hypotheses score 0.
    fn peak_correlation(&self, traces: &[Vec<f64>], hypotheses: &[f64]) -> f64 {
        if hypotheses.is_empty() {
            return 0.0;
        }
        let h_mean = hypotheses.iter().sum::<f64>() / hypotheses.len() as f64;
        let h_dev = hypotheses
            .iter()
            .map(|h| (h - h_mean).powi(2))
            .sum::<f64>()
            .sqrt();
        if h_dev == 0.0 {
            return 0.0;
        }
        let mut peak = 0.0f64;
        for (j, (mean, dev)) in self.means.iter().zip(&self.deviations).enumerate() {
            if *dev == 0.0 {
                continue;
            }
            let covariance: f64 = traces
                .iter()
                .zip(hypotheses)
                .map(|(t, h)| (t[j] - mean) * (h - h_mean))
                .sum();
            peak = peak.max((covariance / (dev * h_dev)).abs());
        }
        peak
    }
}

/// Bisection search for the number of traces an attack needs.
///
/// A trace count "breaks" the target when at least `success_ratio` of
/// `runs` independent campaigns recover the first 16 key bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assessment {
    /// Target under attack.
    pub target: TargetConfig,
    /// Technique.
    pub attack: Attack,
    /// Standard deviation of the simulated noise.
    pub noise: f64,
    /// Upper bound of the search.
    pub max_traces: usize,
    /// Campaigns per trace count.
    pub runs: usize,
    /// Fraction of campaigns that must succeed.
    pub success_ratio: f64,
}

impl Assessment {
    /// Search bounds used by default: up to 500 traces, 9 of 10 runs.
    pub fn new(target: TargetConfig) -> Self {
        Self {
            target,
            attack: Attack::Cpa,
            noise: 1.0,
            max_traces: 500,
            runs: 10,
            success_ratio: 0.9,
        }
    }

    /// Captures `traces` payloads with a fresh campaign and attacks them.
    pub fn attempt<R: RngCore>(
        &self,
        key: &[u8],
        traces: usize,
        rng: &mut R,
    ) -> Result<bool, TargetError> {
        let mut campaign = Campaign::new(
            self.target,
            key,
            ChaCha20Rng::seed_from_u64(rng.next_u64()),
        )?;
        let records = campaign.run(traces)?;
        let model = LeakageModel::for_cipher(&self.target.cipher, self.noise);
        let set = TraceSet::simulate(&records, self.target.mode, &model, rng)?;
        let guess = self.attack.recover(model.table(), &set);
        Ok(key.get(..guess.len()) == Some(&guess[..]))
    }

    /// How many of [`Self::runs`] campaigns of `traces` payloads succeed.
    pub fn successes<R: RngCore>(
        &self,
        key: &[u8],
        traces: usize,
        rng: &mut R,
    ) -> Result<usize, TargetError> {
        let mut count = 0;
        for _ in 0..self.runs {
            if self.attempt(key, traces, rng)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn breaks<R: RngCore>(&self, key: &[u8], traces: usize, rng: &mut R) -> Result<bool, TargetError> {
        let successes = self.successes(key, traces, rng)?;
        Ok(successes as f64 >= self.success_ratio * self.runs as f64)
    }

    /// Smallest trace count in `1..=max_traces` that breaks the target,
    /// assuming success is monotone in the trace count. `None` when even
    /// `max_traces` does not.
    pub fn traces_to_break<R: RngCore>(
        &self,
        key: &[u8],
        rng: &mut R,
    ) -> Result<Option<usize>, TargetError> {
        if self.runs == 0 || self.max_traces == 0 || !self.breaks(key, self.max_traces, rng)? {
            return Ok(None);
        }
        let (mut lo, mut hi) = (0, self.max_traces);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.breaks(key, mid, rng)? {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(Some(hi))
    }
}

/// Reproducible RNG for [`Assessment`] searches.
pub fn assessment_rng(seed: u64) -> impl RngCore {
    ChaCha20Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetMode;
    use aes_core::{CipherConfig, Construction, SboxTable};

    const KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    fn traces(config: TargetConfig, key: &[u8], n: usize, sigma: f64, seed: u64) -> TraceSet {
        let records = Campaign::seeded(config, key, seed).unwrap().run(n).unwrap();
        let model = LeakageModel::for_cipher(&config.cipher, sigma);
        let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0xffff);
        TraceSet::simulate(&records, config.mode, &model, &mut rng).unwrap()
    }

    #[test]
    fn cpa_recovers_standard_key_at_low_noise() {
        let config = TargetConfig::default();
        let set = traces(config, &KEY, 200, 0.5, 1);
        assert_eq!(cpa_recover(SboxTable::STANDARD.forward(), &set), KEY);
    }

    #[test]
    fn dpa_recovers_standard_key_with_enough_traces() {
        let config = TargetConfig::default();
        let set = traces(config, &KEY, 1500, 0.25, 2);
        assert_eq!(Attack::Dpa.recover(SboxTable::STANDARD.forward(), &set), KEY);
    }

    #[test]
    fn cpa_uses_composed_table_and_cbc_whitening() {
        let config = TargetConfig {
            mode: TargetMode::Cbc,
            cipher: CipherConfig {
                sbox: SboxTable::EXPERIMENTAL,
                construction: Construction::ComposedSubstitution(SboxTable::ALTERNATE),
            },
        };
        let key: Vec<u8> = (0..32u8).map(|i| 0x5a ^ i).collect();
        let set = traces(config, &key, 200, 0.5, 3);
        let model = LeakageModel::for_cipher(&config.cipher, 0.5);
        assert_eq!(cpa_recover(model.table(), &set)[..], key[..16]);
    }

    #[test]
    fn constant_inputs_reveal_nothing() {
        let config = TargetConfig {
            mode: TargetMode::Ctr,
            cipher: CipherConfig::default(),
        };
        let set = traces(config, &KEY, 50, 0.5, 4);
        assert!(set.inputs.iter().all(|input| *input == set.inputs[0]));
        assert_eq!(cpa_recover(SboxTable::STANDARD.forward(), &set), [0u8; 16]);
        assert_eq!(dpa_recover(SboxTable::STANDARD.forward(), &set), [0u8; 16]);
    }

    #[test]
    fn empty_set_does_not_panic() {
        let set = TraceSet::default();
        assert_eq!(Attack::Cpa.recover(SboxTable::STANDARD.forward(), &set), [0u8; 16]);
        assert_eq!(Attack::Dpa.recover(SboxTable::STANDARD.forward(), &set), [0u8; 16]);
    }

    fn quick(target: TargetConfig) -> Assessment {
        Assessment {
            noise: 0.5,
            max_traces: 64,
            runs: 4,
            ..Assessment::new(target)
        }
    }

    #[test]
    fn traces_to_break_is_bounded_and_seed_deterministic() {
        let assessment = quick(TargetConfig::default());
        let first = assessment
            .traces_to_break(&KEY, &mut assessment_rng(11))
            .unwrap();
        let second = assessment
            .traces_to_break(&KEY, &mut assessment_rng(11))
            .unwrap();
        assert_eq!(first, second);
        let n = first.expect("low-noise CPA breaks within 64 traces");
        assert!((2..=64).contains(&n), "n = {n}");
    }

    #[test]
    fn unbreakable_target_reports_none() {
        let assessment = quick(TargetConfig {
            mode: TargetMode::Ctr,
            cipher: CipherConfig::default(),
        });
        assert_eq!(
            assessment.traces_to_break(&KEY, &mut assessment_rng(12)).unwrap(),
            None
        );
        let none = Assessment {
            runs: 0,
            ..assessment
        };
        assert_eq!(none.traces_to_break(&KEY, &mut assessment_rng(12)).unwrap(), None);
    }
}
