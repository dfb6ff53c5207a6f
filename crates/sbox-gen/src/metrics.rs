//! Cryptographic profile of an 8-bit S-box.
//!
//! The figures follow the usual definitions: linear and differential
//! properties from the LAT and DDT, boomerang uniformity from the BCT, branch
//! numbers, and the avalanche criteria (SAC, BIC) computed by flipping one
//! input bit at a time.

use aes_core::SboxTable;
use serde::{Deserialize, Serialize};

const SIZE: usize = 256;
const BITS: usize = 8;

/// Summary of an S-box's resistance figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SboxMetrics {
    /// Distance to the closest affine function over all component functions.
    pub nonlinearity: u32,
    /// Largest absolute Walsh coefficient over nonzero output masks.
    pub linearity: u32,
    /// Largest absolute LAT bias divided by 256.
    pub linear_probability: f64,
    /// Largest DDT entry over nonzero input differences.
    pub differential_uniformity: u32,
    /// `differential_uniformity / 256`.
    pub differential_probability: f64,
    /// Largest BCT entry over nonzero input and output differences; only
    /// defined for permutations.
    pub boomerang_uniformity: Option<u32>,
    /// Minimum of `wt(a ⊕ b) + wt(S(a) ⊕ S(b))` over `a ≠ b`.
    pub differential_branch_number: u32,
    /// Minimum of `wt(α) + wt(β)` over `α ≠ 0` with a nonzero LAT entry,
    /// or 16 when no such pair exists.
    pub linear_branch_number: u32,
    /// Bit independence criterion: largest absolute correlation between two
    /// output avalanche bits.
    pub bic: f64,
    /// Strict avalanche criterion: mean probability that an output bit flips
    /// when one input bit flips.
    pub sac: f64,
}

impl SboxMetrics {
    /// Computes every figure for the forward mapping `sbox`, which need not
    /// be a bijection.
    pub fn compute(sbox: &[u8; SIZE]) -> Self {
        let (linearity, linear_branch_number) = linear_profile(sbox);
        let differential_uniformity = differential_uniformity(sbox);
        Self {
            nonlinearity: (SIZE as u32 / 2) - linearity / 2,
            linearity,
            linear_probability: f64::from(linearity / 2) / SIZE as f64,
            differential_uniformity,
            differential_probability: f64::from(differential_uniformity) / SIZE as f64,
            boomerang_uniformity: SboxTable::from_forward(*sbox)
                .ok()
                .map(|table| boomerang_uniformity(&table)),
            differential_branch_number: differential_branch_number(sbox),
            linear_branch_number,
            bic: bit_independence(sbox),
            sac: strict_avalanche(sbox),
        }
    }
}

/// In-place fast Walsh–Hadamard transform.
fn walsh_hadamard(values: &mut [i32; SIZE]) {
    let mut half = 1;
    while half < SIZE {
        for start in (0..SIZE).step_by(half * 2) {
            for i in start..start + half {
                let (a, b) = (values[i], values[i + half]);
                values[i] = a + b;
                values[i + half] = a - b;
            }
        }
        half *= 2;
    }
}

/// Returns `(linearity, linear branch number)`.
fn linear_profile(sbox: &[u8; SIZE]) -> (u32, u32) {
    let mut linearity = 0u32;
    let mut branch = (2 * BITS) as u32;
    for beta in 1..SIZE {
        let mut spectrum = [0i32; SIZE];
        for (x, value) in spectrum.iter_mut().enumerate() {
            let parity = (sbox[x] as usize & beta).count_ones() & 1;
            *value = if parity == 0 { 1 } else { -1 };
        }
        walsh_hadamard(&mut spectrum);
        for (alpha, &coefficient) in spectrum.iter().enumerate() {
            linearity = linearity.max(coefficient.unsigned_abs());
            if alpha != 0 && coefficient != 0 {
                branch = branch.min(alpha.count_ones() + beta.count_ones());
            }
        }
    }
    (linearity, branch)
}

fn differential_uniformity(sbox: &[u8; SIZE]) -> u32 {
    let mut worst = 0;
    for delta in 1..SIZE {
        let mut counts = [0u32; SIZE];
        for x in 0..SIZE {
            counts[(sbox[x] ^ sbox[x ^ delta]) as usize] += 1;
        }
        worst = worst.max(counts.iter().copied().max().unwrap_or(0));
    }
    worst
}

fn boomerang_uniformity(table: &SboxTable) -> u32 {
    let mut worst = 0;
    for delta_in in 1..=255u8 {
        for nabla_out in 1..=255u8 {
            let count = (0..=255u8)
                .filter(|&x| {
                    let left = table.inv_sub(table.sub(x) ^ nabla_out);
                    let right = table.inv_sub(table.sub(x ^ delta_in) ^ nabla_out);
                    left ^ right == delta_in
                })
                .count() as u32;
            worst = worst.max(count);
        }
    }
    worst
}

fn differential_branch_number(sbox: &[u8; SIZE]) -> u32 {
    let mut branch = u32::MAX;
    for a in 0..SIZE {
        for b in (a + 1)..SIZE {
            let weight = (a ^ b).count_ones() + (sbox[a] ^ sbox[b]).count_ones();
            branch = branch.min(weight);
        }
    }
    branch
}

/// Output difference bit `j` when input bit `i` of `x` flips.
#[inline]
fn avalanche_bit(sbox: &[u8; SIZE], x: usize, i: usize, j: usize) -> u8 {
    ((sbox[x] ^ sbox[x ^ (1 << i)]) >> j) & 1
}

fn strict_avalanche(sbox: &[u8; SIZE]) -> f64 {
    let mut flips = 0u32;
    for i in 0..BITS {
        for x in 0..SIZE {
            flips += (sbox[x] ^ sbox[x ^ (1 << i)]).count_ones();
        }
    }
    f64::from(flips) / (SIZE * BITS * BITS) as f64
}

fn bit_independence(sbox: &[u8; SIZE]) -> f64 {
    let mut worst = 0.0f64;
    for i in 0..BITS {
        for j in 0..BITS {
            for k in (j + 1)..BITS {
                let column_j: Vec<f64> = (0..SIZE)
                    .map(|x| f64::from(avalanche_bit(sbox, x, i, j)))
                    .collect();
                let column_k: Vec<f64> = (0..SIZE)
                    .map(|x| f64::from(avalanche_bit(sbox, x, i, k)))
                    .collect();
                if let Some(corr) = correlation(&column_j, &column_k) {
                    worst = worst.max(corr.abs());
                }
            }
        }
    }
    worst
}

/// Pearson correlation, or `None` when either side is constant.
fn correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a * var_b).sqrt())
}
