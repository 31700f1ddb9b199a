//! Multiplicative-update solver for `W ≈ H·Hᵀ`.
//!
//! Each iteration rescales every cell of H by a damped ratio of non-negative
//! terms:
//!
//! ```text
//! H'[i][j] = H[i][j] · (1 - β + β · (W·H)[i][j] / ((H·Hᵀ·H)[i][j] + ε_den))
//! ```
//!
//! The update is Jacobi-style: all cells read the same H and write into a
//! fresh buffer. The loop stops once `‖H' - H‖²_F < convergence_eps` or after
//! `max_iter` iterations; running out of iterations is not an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::algo::matrix::Matrix;
use crate::error::{Result, SymNmfError};

/// Tunable constants of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Iteration cap (default: 300).
    pub max_iter: usize,
    /// Threshold on the squared Frobenius norm of successive iterates (default: 1e-4).
    pub convergence_eps: f64,
    /// Added to the denominator so all-zero rows of H never divide by zero (default: 1e-7).
    pub denominator_eps: f64,
    /// Mixing coefficient β in (0, 1] (default: 0.5).
    pub beta: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iter: 300,
            convergence_eps: 1e-4,
            denominator_eps: 1e-7,
            beta: 0.5,
        }
    }
}

impl OptimizerConfig {
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn convergence_eps(mut self, eps: f64) -> Self {
        self.convergence_eps = eps;
        self
    }

    pub fn denominator_eps(mut self, eps: f64) -> Self {
        self.denominator_eps = eps;
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(SymNmfError::InvalidConfig("max_iter must be at least 1".into()));
        }
        if !(self.convergence_eps > 0.0) {
            return Err(SymNmfError::InvalidConfig(format!(
                "convergence_eps must be positive, got {}",
                self.convergence_eps
            )));
        }
        if !(self.denominator_eps > 0.0) {
            return Err(SymNmfError::InvalidConfig(format!(
                "denominator_eps must be positive, got {}",
                self.denominator_eps
            )));
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(SymNmfError::InvalidConfig(format!(
                "beta must be in (0, 1], got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// Terminal state of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// Successive iterates moved less than the threshold.
    Converged,
    /// The iteration cap was reached first.
    Exhausted,
}

/// Optimized factor with run statistics.
#[derive(Debug, Clone)]
pub struct Optimized {
    pub h: Matrix,
    pub iterations: usize,
    pub termination: Termination,
    /// Squared Frobenius distance between the last two iterates.
    pub last_delta: f64,
}

impl Optimized {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Refine `h0` (n×k) against `w` (n×n).
pub fn optimize(h0: Matrix, w: &Matrix, config: &OptimizerConfig) -> Result<Optimized> {
    config.validate()?;
    let (n, k) = h0.shape();
    if w.shape() != (n, n) {
        return Err(SymNmfError::ShapeMismatch {
            op: "optimize",
            left: h0.shape(),
            right: w.shape(),
        });
    }

    let mut h = h0;
    let mut last_delta = f64::INFINITY;
    for iteration in 1..=config.max_iter {
        let next = update(&h, w, config)?;
        last_delta = next.sq_frobenius_distance(&h)?;
        trace!(iteration, delta = last_delta, "symnmf update");
        h = next;
        if last_delta < config.convergence_eps {
            debug!(n, k, iterations = iteration, delta = last_delta, "symnmf converged");
            return Ok(Optimized {
                h,
                iterations: iteration,
                termination: Termination::Converged,
                last_delta,
            });
        }
    }

    warn!(
        n,
        k,
        max_iter = config.max_iter,
        delta = last_delta,
        "symnmf did not converge"
    );
    Ok(Optimized {
        h,
        iterations: config.max_iter,
        termination: Termination::Exhausted,
        last_delta,
    })
}

/// One synchronous multiplicative update.
fn update(h: &Matrix, w: &Matrix, config: &OptimizerConfig) -> Result<Matrix> {
    let numerator = w.mul(h)?;
    let hth = h.transpose_mul(h)?;
    let denominator = h.mul(&hth)?;

    let beta = config.beta;
    let eps = config.denominator_eps;
    let mut next = Matrix::zeros(h.rows(), h.cols())?;
    next.par_fill_rows(|i, row| {
        let cells = row
            .iter_mut()
            .zip(h.row(i))
            .zip(numerator.row(i).iter().zip(denominator.row(i)));
        for ((out, &hij), (&num, &den)) in cells {
            *out = hij * (beta * (num / (den + eps)) + (1.0 - beta));
        }
    });
    Ok(next)
}
