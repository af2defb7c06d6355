mod analyzer;
mod pipeline;
mod prompts;
mod synthesizer;
mod types;
mod validate;

pub use analyzer::{perspective_set_schema, PerspectiveAnalyzer};
pub use pipeline::{AnalysisPipeline, PipelineState};
pub use prompts::priority_order;
pub use synthesizer::{synthesis_schema, Synthesizer};
pub use types::*;
