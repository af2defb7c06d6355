//! Stage two: weighted consolidation of the five perspectives

use crate::error::GenerationError;
use crate::parser::decode_structured;
use crate::provider::StructuredGenerator;
use crate::schema::SchemaDescriptor;
use std::sync::Arc;
use tracing::{debug, info};

use super::prompts::synthesis_prompt;
use super::types::{Dimension, PerspectiveSet, PriorityWeights, Synthesis};
use super::validate::check_synthesis;

pub const STAGE: &str = "synthesis";

pub fn synthesis_schema() -> SchemaDescriptor {
    let strings = || SchemaDescriptor::array_of(SchemaDescriptor::String);

    let conflict = SchemaDescriptor::object()
        .field("conflict", SchemaDescriptor::String)
        .field("resolution", SchemaDescriptor::String)
        .optional("tradeoff", SchemaDescriptor::String);

    let outcomes = Dimension::ALL
        .iter()
        .fold(SchemaDescriptor::object(), |schema, dimension| {
            schema.optional(dimension.key(), SchemaDescriptor::String)
        });

    SchemaDescriptor::object()
        .field("final_recommendation", SchemaDescriptor::String)
        .field("confidence", SchemaDescriptor::Integer)
        .field("reasoning_chain", strings())
        .optional("consensus_points", strings())
        .field("conflicts_resolved", SchemaDescriptor::array_of(conflict))
        .field("action_plan", strings())
        .field("outcomes", outcomes)
}

pub struct Synthesizer {
    generator: Arc<dyn StructuredGenerator>,
    strict: bool,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn StructuredGenerator>, strict: bool) -> Self {
        Self { generator, strict }
    }

    /// Conflict arbitration is left to the model; the weights only shape the prompt.
    pub async fn synthesize(
        &self,
        problem: &str,
        perspectives: &PerspectiveSet,
        weights: PriorityWeights,
    ) -> Result<Synthesis, GenerationError> {
        let prompt = synthesis_prompt(problem, perspectives, &weights).map_err(|e| {
            GenerationError::Transport {
                message: format!("Failed to serialize synthesis input: {}", e),
            }
        })?;
        debug!(
            "Requesting synthesis from {} ({} byte prompt)",
            self.generator.name(),
            prompt.len()
        );

        let value = self
            .generator
            .generate(&prompt, &synthesis_schema())
            .await
            .map_err(|e| e.into_generation_error(STAGE))?;

        let synthesis: Synthesis = decode_structured(value, STAGE)?;
        check_synthesis(&synthesis, self.strict)
            .map_err(|reason| GenerationError::ParseFailure {
                stage: STAGE,
                reason,
            })?;

        info!(
            "Synthesis: {} (confidence {}, {} conflicts resolved)",
            synthesis.final_recommendation,
            synthesis.confidence,
            synthesis.conflicts_resolved.len()
        );

        Ok(synthesis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_perspectives, synthesis_json, StubGenerator};

    #[test]
    fn test_schema_required_fields() {
        let schema = synthesis_schema();
        assert_eq!(
            schema.required_keys(),
            [
                "final_recommendation",
                "confidence",
                "reasoning_chain",
                "conflicts_resolved",
                "action_plan",
                "outcomes"
            ]
        );
        let rendered = schema.to_json_schema();
        assert_eq!(
            rendered["properties"]["conflicts_resolved"]["items"]["required"],
            serde_json::json!(["conflict", "resolution"])
        );
    }

    #[tokio::test]
    async fn test_weights_flow_into_prompt() {
        let stub = Arc::new(StubGenerator::new(vec![Ok(synthesis_json())]));
        let synthesizer = Synthesizer::new(stub.clone(), true);
        let weights = PriorityWeights {
            security: 5,
            performance: 90,
            cost: 10,
            developer: 20,
            business: 30,
        };

        synthesizer
            .synthesize("Should we migrate?", &sample_perspectives(), weights)
            .await
            .unwrap();

        let prompt = &stub.prompts()[0];
        assert!(prompt.contains(r#""performance":90"#));
        assert!(prompt.contains("Priority Order: performance (90) > business (30)"));
        assert!(prompt.contains("Budget-conscious incremental path"));
    }

    #[tokio::test]
    async fn test_missing_final_recommendation() {
        let mut payload = synthesis_json();
        payload
            .as_object_mut()
            .unwrap()
            .remove("final_recommendation");
        let stub = Arc::new(StubGenerator::new(vec![Ok(payload)]));
        let synthesizer = Synthesizer::new(stub, true);

        let err = synthesizer
            .synthesize("p", &sample_perspectives(), PriorityWeights::default())
            .await
            .unwrap_err();
        match err {
            GenerationError::ParseFailure { stage, reason } => {
                assert_eq!(stage, "synthesis");
                assert!(reason.contains("final_recommendation"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_reasoning_chain_rejected() {
        let mut payload = synthesis_json();
        payload["reasoning_chain"] = serde_json::json!([]);
        let stub = Arc::new(StubGenerator::new(vec![Ok(payload)]));
        let synthesizer = Synthesizer::new(stub, false);

        let err = synthesizer
            .synthesize("p", &sample_perspectives(), PriorityWeights::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "parse_failure");
    }
}
