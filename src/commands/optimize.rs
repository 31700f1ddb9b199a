use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type, Value,
};

use super::factor::factorization_value;
use super::util::{
    input_matrix, optimizer_config, to_labeled, value_to_matrix, with_optimizer_flags,
};
use crate::ops;
use crate::SymNmfPlugin;

/// Run the solver on a caller-supplied W and initial H.
pub struct Optimize;

impl PluginCommand for Optimize {
    type Plugin = SymNmfPlugin;

    fn name(&self) -> &str {
        "symnmf optimize"
    }

    fn description(&self) -> &str {
        "Refine an initial factor H against a normalized similarity matrix W"
    }

    fn signature(&self) -> Signature {
        let sig = Signature::build(self.name())
            .input_output_type(Type::List(Box::new(Type::Any)), Type::record())
            .required_named(
                "init",
                SyntaxShape::List(Box::new(SyntaxShape::Any)),
                "Initial non-negative n×k factor H",
                None,
            )
            .category(Category::Experimental);
        with_optimizer_flags(sig)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["symnmf", "nmf", "multiplicative", "update"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "let w = ([[0 0] [0 1] [10 10] [10 11]] | symnmf norm); $w | symnmf optimize --init [[0.6 0.2] [0.5 0.3] [0.2 0.5] [0.3 0.6]]",
            description: "Optimize a hand-picked seed",
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
        let config = optimizer_config(call)?;
        let init: Value = call.get_flag::<Value>("init")?.ok_or_else(|| {
            LabeledError::new("Missing --init").with_label("initial H is required", head)
        })?;
        let h0 = value_to_matrix(&init, head)?;
        let w = input_matrix(input, head)?;

        let result = ops::op_symnmf(h0, &w, &config).map_err(|e| to_labeled(e, head))?;
        Ok(PipelineData::Value(factorization_value(&result, head), None))
    }
}
