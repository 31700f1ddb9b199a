use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Record, Signature, SyntaxShape, Type, Value,
};

use super::util::{input_matrix, optimizer_config, rank, seed, to_labeled, with_optimizer_flags};
use crate::ops;
use crate::SymNmfPlugin;

pub struct Analyze;

impl PluginCommand for Analyze {
    type Plugin = SymNmfPlugin;

    fn name(&self) -> &str {
        "symnmf analyze"
    }

    fn description(&self) -> &str {
        "Compare SymNMF and k-means clusterings by silhouette score"
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
        vec!["silhouette", "kmeans", "compare", "quality"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "[[0 0] [0 1] [1 0] [10 10] [10 11] [11 10]] | symnmf analyze --rank 2",
            description: "Silhouette scores of both clusterings",
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

        let analysis =
            ops::op_analyze(&points, k, seed, &config).map_err(|e| to_labeled(e, head))?;

        let mut output = Record::new();
        output.push("nmf", Value::float(analysis.nmf, head));
        output.push("kmeans", Value::float(analysis.kmeans, head));
        Ok(PipelineData::Value(Value::record(output, head), None))
    }
}
