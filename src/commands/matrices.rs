use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, Type};

use super::util::{input_matrix, matrix_value, to_labeled};
use crate::algo::matrix::Matrix;
use crate::error::Result;
use crate::ops;
use crate::SymNmfPlugin;

fn matrix_signature(name: &str) -> Signature {
    Signature::build(name)
        .input_output_types(vec![
            (Type::List(Box::new(Type::Any)), Type::List(Box::new(Type::Any))),
            (Type::table(), Type::List(Box::new(Type::Any))),
        ])
        .category(Category::Experimental)
}

fn run_matrix_op(
    call: &EvaluatedCall,
    input: PipelineData,
    op: fn(&Matrix) -> Result<Matrix>,
) -> std::result::Result<PipelineData, LabeledError> {
    let head = call.head;
    let points = input_matrix(input, head)?;
    let result = op(&points).map_err(|e| to_labeled(e, head))?;
    Ok(PipelineData::Value(matrix_value(&result, head), None))
}

pub struct Sym;

impl PluginCommand for Sym {
    type Plugin = SymNmfPlugin;

    fn name(&self) -> &str {
        "symnmf sym"
    }

    fn description(&self) -> &str {
        "Gaussian similarity matrix of a point set"
    }

    fn signature(&self) -> Signature {
        matrix_signature(self.name())
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["similarity", "affinity", "gaussian", "kernel"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "[[0 0] [0 1] [10 10] [10 11]] | symnmf sym",
            description: "Affinity matrix of four 2-d points",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &SymNmfPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> std::result::Result<PipelineData, LabeledError> {
        run_matrix_op(call, input, ops::op_sym)
    }
}

pub struct Ddg;

impl PluginCommand for Ddg {
    type Plugin = SymNmfPlugin;

    fn name(&self) -> &str {
        "symnmf ddg"
    }

    fn description(&self) -> &str {
        "Diagonal degree matrix of a point set's similarity graph"
    }

    fn signature(&self) -> Signature {
        matrix_signature(self.name())
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["degree", "diagonal", "graph"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "[[x y]; [0 0] [0 1] [1 1]] | symnmf ddg",
            description: "Degree matrix from a table of points",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &SymNmfPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> std::result::Result<PipelineData, LabeledError> {
        run_matrix_op(call, input, ops::op_ddg)
    }
}

pub struct Norm;

impl PluginCommand for Norm {
    type Plugin = SymNmfPlugin;

    fn name(&self) -> &str {
        "symnmf norm"
    }

    fn description(&self) -> &str {
        "Normalized similarity matrix D^(-1/2) A D^(-1/2)"
    }

    fn signature(&self) -> Signature {
        matrix_signature(self.name())
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["normalize", "laplacian", "graph"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "open points.txt | from csv --noheaders | symnmf norm",
            description: "Normalized similarity matrix of a CSV point file",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &SymNmfPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> std::result::Result<PipelineData, LabeledError> {
        run_matrix_op(call, input, ops::op_norm)
    }
}
