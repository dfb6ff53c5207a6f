//! Byte-wise affine maps and affine equivalence of S-boxes.

use rand::{CryptoRng, RngCore};

use crate::matrix::Matrix8;

/// `x -> lin * x ⊕ bias` on a byte, bits taken as a column vector (LSB first).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affine8 {
    /// Linear part.
    pub lin: Matrix8,
    /// Constant added after the linear part.
    pub bias: u8,
}

impl Affine8 {
    /// Output transform of the AES SubBytes step (FIPS-197 §5.1.1), constant `0x63`.
    pub const AES: Self = Self::new(
        Matrix8::from_rows([0xf1, 0xe3, 0xc7, 0x8f, 0x1f, 0x3e, 0x7c, 0xf8]),
        0x63,
    );

    /// Map from its parts.
    pub const fn new(lin: Matrix8, bias: u8) -> Self {
        Self { lin, bias }
    }

    /// Identity map.
    pub fn identity() -> Self {
        Self::new(Matrix8::identity(), 0)
    }

    /// Uniform bijective map: invertible linear part, uniform bias.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let lin = Matrix8::random_invertible(rng);
        let mut bias = [0u8; 1];
        rng.fill_bytes(&mut bias);
        Self::new(lin, bias[0])
    }

    /// Evaluates the map.
    pub fn apply(&self, value: u8) -> u8 {
        self.lin.apply(value) ^ self.bias
    }

    /// `y -> lin⁻¹ * y ⊕ lin⁻¹ * bias`; `None` when the linear part is singular.
    pub fn invert(&self) -> Option<Self> {
        self.lin
            .invert()
            .map(|lin_inv| Self::new(lin_inv, lin_inv.apply(self.bias)))
    }

    /// The map `x -> self(other(x))`.
    pub fn compose(&self, other: &Self) -> Self {
        Self::new(
            self.lin.mul(&other.lin),
            self.lin.apply(other.bias) ^ self.bias,
        )
    }
}

/// Table of `outer ∘ table ∘ inner`.
///
/// When both maps are bijective the result is a permutation with the same
/// differential and linear spectra as `table`.
pub fn affine_equivalent(table: &[u8; 256], inner: &Affine8, outer: &Affine8) -> [u8; 256] {
    core::array::from_fn(|x| outer.apply(table[inner.apply(x as u8) as usize]))
}
