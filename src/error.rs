//! Error types shared by the numerical core and its boundary layers.
//!
//! The core never terminates the process. Every failure is returned as a
//! [`SymNmfError`]; the CLI decides how to report it.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SymNmfError>;

#[derive(Debug, Error)]
pub enum SymNmfError {
    /// Matrix storage could not be obtained.
    #[error("Failed to allocate a {rows}x{cols} matrix")]
    AllocationFailure { rows: usize, cols: usize },

    /// The input file is missing or unreadable.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),

    /// Malformed or ragged point data.
    #[error("Malformed input at line {line}: {reason}")]
    InputFormat { line: usize, reason: String },

    /// A point has zero total similarity, so D^(-1/2) is undefined.
    #[error("Point {index} has zero degree; the normalized similarity matrix is undefined")]
    NumericDegeneracy { index: usize },

    /// Unrecognized goal name.
    #[error("Unknown goal '{0}'. Use: sym, ddg, norm, symnmf, analyze")]
    InvalidGoal(String),

    /// Operand shapes do not line up.
    #[error("Shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Rank k outside 1..=n.
    #[error("Rank k={k} is invalid for {n} points (expected 1 <= k <= n)")]
    InvalidRank { k: usize, n: usize },

    /// Optimizer hyperparameters out of range.
    #[error("Invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    /// Arguments that are well-formed but unusable, e.g. a single cluster for silhouette.
    #[error("{0}")]
    InvalidArgument(String),
}

impl SymNmfError {
    pub(crate) fn allocation(rows: usize, cols: usize) -> impl FnOnce(TryReserveError) -> Self {
        move |_| Self::AllocationFailure { rows, cols }
    }
}

impl From<csv::Error> for SymNmfError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::IoFailure(io),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => Self::InputFormat {
                line,
                reason: format!("expected {expected_len} fields, found {len}"),
            },
            other => Self::InputFormat {
                line,
                reason: format!("{other:?}"),
            },
        }
    }
}
