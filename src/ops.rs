//! Shared operation wrappers for all interfaces (CLI, plugin).
//!
//! Each `op_*` function is a pure, synchronous wrapper around one or more
//! `algo` modules. Inputs are validated matrices; outputs are typed values
//! with JSON renderings, so no interface depends on clap or nu-plugin here.

use serde::Serialize;
use serde_json::Value;

use crate::algo::clustering;
use crate::algo::degree::build_degree;
use crate::algo::init::init_h;
use crate::algo::matrix::Matrix;
use crate::algo::normalize::normalize;
use crate::algo::optimize::{optimize, Optimized, OptimizerConfig, Termination};
use crate::algo::points::format_matrix;
use crate::algo::similarity::build_affinity;
use crate::error::{Result, SymNmfError};

/// Iteration cap and tolerance for the k-means baseline in `analyze`.
const KMEANS_MAX_ITER: usize = 300;
const KMEANS_EPS: f64 = 1e-4;

// ── Goals ────────────────────────────────────────────────────────────────────

/// Named operation selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Affinity matrix A.
    Sym,
    /// Diagonal degree matrix D.
    Ddg,
    /// Normalized affinity W.
    Norm,
    /// Full pipeline, prints the optimized H.
    SymNmf,
    /// Silhouette scores of SymNMF vs k-means labels.
    Analyze,
}

impl Goal {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sym" => Some(Self::Sym),
            "ddg" => Some(Self::Ddg),
            "norm" => Some(Self::Norm),
            "symnmf" => Some(Self::SymNmf),
            "analyze" => Some(Self::Analyze),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| SymNmfError::InvalidGoal(s.to_string()))
    }

    pub fn all_names() -> &'static [&'static str] {
        &["sym", "ddg", "norm", "symnmf", "analyze"]
    }

    /// Whether the goal needs a rank `k`.
    pub fn needs_rank(&self) -> bool {
        matches!(self, Self::SymNmf | Self::Analyze)
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Output of the full pipeline.
#[derive(Debug, Clone)]
pub struct Factorization {
    pub optimized: Optimized,
    pub assignments: Vec<usize>,
}

/// Silhouette scores of the two clusterings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Analysis {
    pub nmf: f64,
    pub kmeans: f64,
}

/// Output of [`op_goal`].
#[derive(Debug, Clone)]
pub enum GoalOutput {
    Matrix(Matrix),
    Factor(Factorization),
    Analysis(Analysis),
}

impl GoalOutput {
    /// Plain-text rendering: matrices as `%.4f` CSV rows.
    pub fn to_text(&self) -> String {
        match self {
            Self::Matrix(m) => format_matrix(m),
            Self::Factor(f) => format_matrix(&f.optimized.h),
            Self::Analysis(a) => format!("nmf: {:.4}\nkmeans: {:.4}\n", a.nmf, a.kmeans),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Matrix(m) => matrix_to_json(m),
            Self::Factor(f) => factorization_to_json(f),
            Self::Analysis(a) => serde_json::json!(a),
        }
    }
}

pub fn matrix_to_json(m: &Matrix) -> Value {
    serde_json::json!(m.to_rows())
}

pub fn factorization_to_json(f: &Factorization) -> Value {
    let o = &f.optimized;
    serde_json::json!({
        "h": o.h.to_rows(),
        "assignments": f.assignments,
        "iterations": o.iterations,
        "converged": o.termination == Termination::Converged,
        "termination": o.termination,
        "last_delta": o.last_delta,
    })
}

// ── Operations ───────────────────────────────────────────────────────────────

pub fn op_sym(points: &Matrix) -> Result<Matrix> {
    build_affinity(points)
}

pub fn op_ddg(points: &Matrix) -> Result<Matrix> {
    build_degree(&build_affinity(points)?)
}

pub fn op_norm(points: &Matrix) -> Result<Matrix> {
    normalize(&build_affinity(points)?)
}

/// Optimize a caller-supplied seed against W.
pub fn op_symnmf(h0: Matrix, w: &Matrix, config: &OptimizerConfig) -> Result<Factorization> {
    if !h0.is_non_negative() {
        return Err(SymNmfError::InvalidArgument(
            "initial H must be non-negative".into(),
        ));
    }
    let optimized = optimize(h0, w, config)?;
    let assignments = clustering::assignments(&optimized.h);
    Ok(Factorization {
        optimized,
        assignments,
    })
}

/// points → W → seeded H₀ → optimized H.
pub fn op_factorize(
    points: &Matrix,
    k: usize,
    seed: u64,
    config: &OptimizerConfig,
) -> Result<Factorization> {
    let w = op_norm(points)?;
    let h0 = init_h(&w, k, seed)?;
    op_symnmf(h0, &w, config)
}

/// Compare SymNMF hard labels against a k-means baseline by silhouette score.
pub fn op_analyze(
    points: &Matrix,
    k: usize,
    seed: u64,
    config: &OptimizerConfig,
) -> Result<Analysis> {
    let factor = op_factorize(points, k, seed, config)?;
    let nmf = clustering::silhouette_score(points, &factor.assignments)?;
    let km = clustering::kmeans(points, k, KMEANS_MAX_ITER, KMEANS_EPS)?;
    let kmeans = clustering::silhouette_score(points, &km.labels)?;
    Ok(Analysis { nmf, kmeans })
}

/// Dispatch a [`Goal`]. `k` is required only when [`Goal::needs_rank`].
pub fn op_goal(
    goal: Goal,
    points: &Matrix,
    k: Option<usize>,
    seed: u64,
    config: &OptimizerConfig,
) -> Result<GoalOutput> {
    let rank = || {
        k.ok_or_else(|| SymNmfError::InvalidArgument("this goal requires a rank k".into()))
    };
    Ok(match goal {
        Goal::Sym => GoalOutput::Matrix(op_sym(points)?),
        Goal::Ddg => GoalOutput::Matrix(op_ddg(points)?),
        Goal::Norm => GoalOutput::Matrix(op_norm(points)?),
        Goal::SymNmf => GoalOutput::Factor(op_factorize(points, rank()?, seed, config)?),
        Goal::Analyze => GoalOutput::Analysis(op_analyze(points, rank()?, seed, config)?),
    })
}
