mod claude;
mod classify;
mod codex;
mod gemini;

pub use claude::ClaudeGenerator;
pub use classify::classify_failure;
pub use codex::CodexGenerator;
pub use gemini::GeminiGenerator;

use crate::config::{Config, Provider};
use crate::error::{ConfigError, TransportError};
use crate::schema::SchemaDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// The structured-generation capability both pipeline stages depend on.
///
/// Implementations return the backend's JSON answer untouched; decoding and
/// validation against the stage's types happen in the stage itself.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError>;
}

/// One generator per stage; they may share a backend.
#[derive(Clone)]
pub struct StageGenerators {
    pub analysis: Arc<dyn StructuredGenerator>,
    pub synthesis: Arc<dyn StructuredGenerator>,
}

/// Create generators based on the configured provider
pub fn create_generators(config: &Config) -> Result<StageGenerators, ConfigError> {
    match config.provider {
        Provider::Gemini => {
            let gemini = &config.providers.gemini;
            let api_key = gemini.resolve_api_key().ok_or_else(|| {
                ConfigError::Invalid(
                    "No Gemini API key: set providers.gemini.api_key or GEMINI_API_KEY".to_string(),
                )
            })?;
            let timeout = Duration::from_secs(gemini.timeout_sec);
            let analysis = GeminiGenerator::new(
                &gemini.base_url,
                &api_key,
                &gemini.analysis_model,
                None,
                timeout,
            )
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            let synthesis = GeminiGenerator::new(
                &gemini.base_url,
                &api_key,
                &gemini.synthesis_model,
                gemini.synthesis_thinking_budget,
                timeout,
            )
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            Ok(StageGenerators {
                analysis: Arc::new(analysis),
                synthesis: Arc::new(synthesis),
            })
        }
        Provider::ClaudeCli => {
            let cli = &config.providers.claude_cli;
            let runner: Arc<dyn StructuredGenerator> = Arc::new(ClaudeGenerator {
                binary: cli.binary.clone(),
                model: cli.model.clone(),
                timeout: Duration::from_secs(cli.timeout_sec),
            });
            Ok(StageGenerators {
                analysis: runner.clone(),
                synthesis: runner,
            })
        }
        Provider::CodexCli => {
            let cli = &config.providers.codex_cli;
            let runner: Arc<dyn StructuredGenerator> = Arc::new(CodexGenerator {
                binary: cli.binary.clone(),
                model: cli.model.clone(),
                timeout: Duration::from_secs(cli.timeout_sec),
            });
            Ok(StageGenerators {
                analysis: runner.clone(),
                synthesis: runner,
            })
        }
    }
}

/// Prompt suffix telling a CLI backend what shape to answer in
pub(crate) fn with_output_contract(prompt: &str, schema: &SchemaDescriptor) -> String {
    let schema_json = serde_json::to_string_pretty(&schema.to_json_schema())
        .unwrap_or_else(|_| schema.to_json_schema().to_string());
    format!(
        "{}\n\n## Output Format\n\nRespond with ONLY a JSON object that conforms to this JSON Schema. \
        Do not add commentary.\n\n```json\n{}\n```",
        prompt, schema_json
    )
}

/// Build a command - use string for PATH lookup if not an absolute/relative path
pub(crate) fn command_for(binary: &Path) -> Command {
    let binary_str = binary.to_string_lossy();
    if binary_str.contains('/') || binary_str.contains('\\') {
        Command::new(binary)
    } else {
        Command::new(binary_str.as_ref())
    }
}
