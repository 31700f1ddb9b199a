use nu_plugin::EvaluatedCall;
use nu_protocol::{LabeledError, PipelineData, Signature, Span, SyntaxShape, Value};

use crate::algo::init::DEFAULT_SEED;
use crate::algo::matrix::Matrix;
use crate::algo::optimize::OptimizerConfig;
use crate::error::SymNmfError;

/// Collect pipeline input into a matrix.
///
/// Accepts:
///   - List of numeric lists → one row per inner list
///   - Table of records → one row per record, numeric columns in order
///   - Single list of numeric lists → same as the first case
pub fn input_matrix(input: PipelineData, span: Span) -> Result<Matrix, LabeledError> {
    let rows: Vec<Value> = input.into_iter().collect();
    value_rows_to_matrix(&rows, span)
}

/// Convert a `Value::List` of rows (e.g. a flag argument) into a matrix.
pub fn value_to_matrix(value: &Value, span: Span) -> Result<Matrix, LabeledError> {
    match value {
        Value::List { vals, .. } => value_rows_to_matrix(vals, span),
        other => Err(LabeledError::new("Expected a list of rows")
            .with_label(format!("found {}", other.get_type()), other.span())),
    }
}

fn value_rows_to_matrix(rows: &[Value], span: Span) -> Result<Matrix, LabeledError> {
    if rows.is_empty() {
        return Err(LabeledError::new("Need at least 1 point").with_label("empty input", span));
    }
    let parsed = rows
        .iter()
        .map(row_values)
        .collect::<Result<Vec<Vec<f64>>, LabeledError>>()?;
    Matrix::from_rows(&parsed).map_err(|e| to_labeled(e, span))
}

fn row_values(row: &Value) -> Result<Vec<f64>, LabeledError> {
    match row {
        Value::List { vals, .. } => vals.iter().map(number).collect(),
        Value::Record { val, .. } => val.values().map(number).collect(),
        other => Err(LabeledError::new("Expected a list of numbers or a record")
            .with_label(format!("found {}", other.get_type()), other.span())),
    }
}

fn number(v: &Value) -> Result<f64, LabeledError> {
    match v {
        Value::Float { val, .. } if val.is_finite() => Ok(*val),
        Value::Float { val, .. } => Err(LabeledError::new("Expected a finite number")
            .with_label(format!("found {val}"), v.span())),
        Value::Int { val, .. } => Ok(*val as f64),
        other => Err(LabeledError::new("Expected a number")
            .with_label(format!("found {}", other.get_type()), other.span())),
    }
}

/// Matrix → list of float lists.
pub fn matrix_value(m: &Matrix, span: Span) -> Value {
    let rows: Vec<Value> = m
        .iter_rows()
        .map(|row| Value::list(row.iter().map(|&x| Value::float(x, span)).collect(), span))
        .collect();
    Value::list(rows, span)
}

pub fn to_labeled(err: SymNmfError, span: Span) -> LabeledError {
    LabeledError::new(err.to_string()).with_label("symnmf failed here", span)
}

/// Add the solver flags shared by `factor`, `optimize` and `analyze`.
pub fn with_optimizer_flags(sig: Signature) -> Signature {
    sig.named(
        "iterations",
        SyntaxShape::Int,
        "Maximum optimizer iterations (default: 300)",
        Some('i'),
    )
    .named(
        "tol",
        SyntaxShape::Number,
        "Convergence threshold on the squared Frobenius norm (default: 1e-4)",
        None,
    )
    .named(
        "denominator-eps",
        SyntaxShape::Number,
        "Denominator stabilization epsilon (default: 1e-7)",
        None,
    )
    .named(
        "beta",
        SyntaxShape::Number,
        "Update mixing coefficient in (0, 1] (default: 0.5)",
        None,
    )
}

/// Optimizer settings from the shared solver flags.
pub fn optimizer_config(call: &EvaluatedCall) -> Result<OptimizerConfig, LabeledError> {
    let mut config = OptimizerConfig::default();
    if let Some(iter) = call.get_flag::<i64>("iterations")? {
        config = config.max_iter(iter.max(0) as usize);
    }
    if let Some(tol) = call.get_flag::<f64>("tol")? {
        config = config.convergence_eps(tol);
    }
    if let Some(eps) = call.get_flag::<f64>("denominator-eps")? {
        config = config.denominator_eps(eps);
    }
    if let Some(beta) = call.get_flag::<f64>("beta")? {
        config = config.beta(beta);
    }
    config.validate().map_err(|e| to_labeled(e, call.head))?;
    Ok(config)
}

/// `--rank` (required for factor/analyze) as a positive count.
pub fn rank(call: &EvaluatedCall) -> Result<usize, LabeledError> {
    let k: i64 = call.get_flag::<i64>("rank")?.ok_or_else(|| {
        LabeledError::new("Missing --rank").with_label("rank k is required", call.head)
    })?;
    if k < 1 {
        return Err(LabeledError::new(format!("Rank must be at least 1, got {k}"))
            .with_label("invalid rank", call.head));
    }
    Ok(k as usize)
}

pub fn seed(call: &EvaluatedCall) -> Result<u64, LabeledError> {
    Ok(call
        .get_flag::<i64>("seed")?
        .map(|s| s as u64)
        .unwrap_or(DEFAULT_SEED))
}
