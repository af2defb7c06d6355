use super::{classify_failure, command_for, with_output_contract, StructuredGenerator};
use crate::error::{TransportCategory, TransportError};
use crate::parser::extract_json;
use crate::schema::SchemaDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout as tokio_timeout;

/// Structured generation through `codex exec`
pub struct CodexGenerator {
    pub binary: PathBuf,
    pub model: String,
    pub timeout: Duration,
}

#[async_trait]
impl StructuredGenerator for CodexGenerator {
    fn name(&self) -> &'static str {
        "codex_cli"
    }

    async fn generate(
        &self,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        let full_prompt = with_output_contract(prompt, schema);

        // Capture the final assistant message to a temp file
        let out_file = NamedTempFile::new()
            .map_err(|e| TransportError::other(format!("Failed to create temp file: {}", e)))?;

        let mut cmd = command_for(&self.binary);
        cmd.arg("exec")
            .arg("--model")
            .arg(&self.model)
            .arg("--output-last-message")
            .arg(out_file.path())
            // Read prompt from stdin
            .arg("-");

        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| TransportError::other(format!("Failed to run codex: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(full_prompt.as_bytes())
                .await
                .map_err(|e| TransportError::other(format!("Failed to write prompt: {}", e)))?;
            stdin
                .shutdown()
                .await
                .map_err(|e| TransportError::other(format!("Failed to write prompt: {}", e)))?;
        }

        let output = tokio_timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                TransportError::other(format!("codex timed out after {:?}", self.timeout))
            })?
            .map_err(|e| TransportError::other(format!("Failed to run codex: {}", e)))?;

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        let last_message = tokio::fs::read_to_string(out_file.path())
            .await
            .unwrap_or_default();

        if last_message.trim().is_empty() {
            return Err(TransportError::new(
                TransportCategory::EmptyResult,
                "codex produced no final message",
            ));
        }

        Ok(extract_json(&last_message).unwrap_or(Value::String(last_message)))
    }
}
