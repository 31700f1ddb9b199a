use crate::algo::matrix::Matrix;
use crate::error::{Result, SymNmfError};

/// Seed used by the CLI and plugin when none is given.
pub const DEFAULT_SEED: u64 = 1234;

/// Random initial factor for the optimizer.
///
/// Entries of the n×k result are uniform on `[0, 2·√(mean(W)/k))`, so the
/// scale of `H·Hᵀ` starts near the scale of W. Deterministic for a given seed.
pub fn init_h(w: &Matrix, k: usize, seed: u64) -> Result<Matrix> {
    let n = w.rows();
    if k == 0 || k > n {
        return Err(SymNmfError::InvalidRank { k, n });
    }
    let upper = 2.0 * (w.mean().max(0.0) / k as f64).sqrt();
    let mut rng = LcgRng::new(seed);
    Matrix::from_fn(n, k, |_, _| rng.next_f64() * upper)
}

/// Linear congruential generator; reproducible across platforms.
pub(crate) struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // LCG constants from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform on `[0, 1)` from the 53 high bits.
    pub(crate) fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
