use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Record, Signature, Span, SyntaxShape, Type,
    Value,
};

use super::util::{
    input_matrix, matrix_value, optimizer_config, rank, seed, to_labeled, with_optimizer_flags,
};
use crate::ops::{self, Factorization};
use crate::SymNmfPlugin;

pub struct Factor;

impl PluginCommand for Factor {
    type Plugin = SymNmfPlugin;

    fn name(&self) -> &str {
        "symnmf factor"
    }

    fn description(&self) -> &str {
        "Cluster points with symmetric NMF: W ≈ H·Hᵀ, one soft membership row per point"
    }

    fn signature(&self) -> Signature {
        let sig = Signature::build(self.name())
            .input_output_types(vec![
                (Type::List(Box::new(Type::Any)), Type::record()),
                (Type::table(), Type::record()),
            ])
            .named(
                "rank",
                SyntaxShape::Int,
                "Number of clusters k (required)",
                Some('k'),
            )
            .named(
                "seed",
                SyntaxShape::Int,
                "Seed for the initial factor (default: 1234)",
                None,
            )
            .category(Category::Experimental);
        with_optimizer_flags(sig)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["symnmf", "nmf", "cluster", "factorize", "spectral"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "[[0 0] [0 1] [10 10] [10 11]] | symnmf factor --rank 2",
            description: "Split four points into two clusters",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &SymNmfPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let head = call.head;
        let k = rank(call)?;
        let seed = seed(call)?;
        let config = optimizer_config(call)?;
        let points = input_matrix(input, head)?;

        let result =
            ops::op_factorize(&points, k, seed, &config).map_err(|e| to_labeled(e, head))?;
        Ok(PipelineData::Value(factorization_value(&result, head), None))
    }
}

/// Record with `h`, `assignments`, `iterations` and `converged`.
pub(super) fn factorization_value(f: &Factorization, head: Span) -> Value {
    let assignments: Vec<Value> = f
        .assignments
        .iter()
        .map(|&c| Value::int(c as i64, head))
        .collect();

    let mut output = Record::new();
    output.push("h", matrix_value(&f.optimized.h, head));
    output.push("assignments", Value::list(assignments, head));
    output.push("iterations", Value::int(f.optimized.iterations as i64, head));
    output.push("converged", Value::bool(f.optimized.converged(), head));
    output.push("last_delta", Value::float(f.optimized.last_delta, head));
    Value::record(output, head)
}
