//! Stage one: five expert assessments from a single structured call

use crate::error::GenerationError;
use crate::parser::decode_structured;
use crate::provider::StructuredGenerator;
use crate::schema::SchemaDescriptor;
use std::sync::Arc;
use tracing::{debug, info};

use super::prompts::perspectives_prompt;
use super::types::{Dimension, PerspectiveSet};
use super::validate::check_perspectives;

pub const STAGE: &str = "analysis";

fn assessment_schema() -> SchemaDescriptor {
    let metric = SchemaDescriptor::object()
        .field("label", SchemaDescriptor::String)
        .field("value", SchemaDescriptor::String);

    SchemaDescriptor::object()
        .field("recommendation", SchemaDescriptor::String)
        .field("confidence", SchemaDescriptor::Integer)
        .field("reasoning", SchemaDescriptor::String)
        .field(
            "key_points",
            SchemaDescriptor::array_of(SchemaDescriptor::String),
        )
        .field("metrics", SchemaDescriptor::array_of(metric))
}

/// Object with exactly the five dimension keys, all required
pub fn perspective_set_schema() -> SchemaDescriptor {
    Dimension::ALL
        .iter()
        .fold(SchemaDescriptor::object(), |schema, dimension| {
            schema.field(dimension.key(), assessment_schema())
        })
}

pub struct PerspectiveAnalyzer {
    generator: Arc<dyn StructuredGenerator>,
    strict: bool,
}

impl PerspectiveAnalyzer {
    pub fn new(generator: Arc<dyn StructuredGenerator>, strict: bool) -> Self {
        Self { generator, strict }
    }

    /// Obtain all five assessments. `problem` and `context` must be plain text.
    pub async fn analyze(
        &self,
        problem: &str,
        context: &str,
    ) -> Result<PerspectiveSet, GenerationError> {
        let prompt = perspectives_prompt(problem, context);
        debug!(
            "Requesting perspectives from {} ({} byte prompt)",
            self.generator.name(),
            prompt.len()
        );

        let value = self
            .generator
            .generate(&prompt, &perspective_set_schema())
            .await
            .map_err(|e| e.into_generation_error(STAGE))?;

        let perspectives: PerspectiveSet = decode_structured(value, STAGE)?;
        check_perspectives(&perspectives, self.strict)
            .map_err(|reason| GenerationError::ParseFailure {
                stage: STAGE,
                reason,
            })?;

        info!(
            "Perspectives received: {}",
            perspectives
                .iter()
                .map(|(d, a)| format!("{}={} ({})", d, a.recommendation, a.confidence))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(perspectives)
    }
}
