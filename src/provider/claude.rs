use super::{classify_failure, command_for, with_output_contract, StructuredGenerator};
use crate::error::{TransportCategory, TransportError};
use crate::parser::{extract_json, parse_cli_envelope};
use crate::schema::SchemaDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

/// Structured generation through `claude -p`
pub struct ClaudeGenerator {
    pub binary: PathBuf,
    pub model: String,
    pub timeout: Duration,
}

#[async_trait]
impl StructuredGenerator for ClaudeGenerator {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    async fn generate(
        &self,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        let full_prompt = with_output_contract(prompt, schema);

        let mut cmd = command_for(&self.binary);
        cmd.arg("-p")
            .arg(&full_prompt)
            .arg("--model")
            .arg(&self.model)
            .arg("--output-format")
            .arg("json");

        let start = std::time::Instant::now();

        let output = tokio_timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                TransportError::other(format!("claude timed out after {:?}", self.timeout))
            })?
            .map_err(|e| TransportError::other(format!("Failed to run claude: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!(
            "claude exited with {:?} after {:?}",
            output.status.code(),
            start.elapsed()
        );

        if !output.status.success() {
            // Claude reports API errors in the JSON envelope on stdout
            let message = if stderr.trim().is_empty() { &stdout } else { &stderr };
            return Err(classify_failure(message));
        }

        interpret_output(stdout)
    }
}

fn empty_result() -> TransportError {
    TransportError::new(TransportCategory::EmptyResult, "claude produced no output")
}

/// Turn a successful run's stdout into the answer value.
///
/// Once the envelope parses, only its `result` is considered. Unparseable
/// text is handed through so the stage reports it as a parse failure.
fn interpret_output(stdout: String) -> Result<Value, TransportError> {
    if stdout.trim().is_empty() {
        return Err(empty_result());
    }

    match parse_cli_envelope(&stdout) {
        Some(envelope) if envelope.is_error => {
            let message = if envelope.result.trim().is_empty() {
                "claude reported an error without details"
            } else {
                envelope.result.as_str()
            };
            Err(classify_failure(message))
        }
        Some(envelope) if envelope.result.trim().is_empty() => Err(empty_result()),
        Some(envelope) => {
            Ok(extract_json(&envelope.result).unwrap_or(Value::String(envelope.result)))
        }
        None => Ok(extract_json(&stdout).unwrap_or(Value::String(stdout))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use crate::testing::fake_cli;
    #[cfg(unix)]
    use tempfile::TempDir;

    fn generator(binary: PathBuf) -> ClaudeGenerator {
        ClaudeGenerator {
            binary,
            model: "sonnet".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::object().field("final_recommendation", SchemaDescriptor::String)
    }

    #[test]
    fn test_envelope_with_json_result() {
        let stdout = r#"{"type":"result","result":"```json\n{\"final_recommendation\": \"Monolith\"}\n```","session_id":"abc"}"#;
        let value = interpret_output(stdout.to_string()).unwrap();
        assert_eq!(value["final_recommendation"], "Monolith");
    }

    #[test]
    fn test_envelope_with_empty_result() {
        let stdout = r#"{"type":"result","result":"","session_id":"abc"}"#;
        let err = interpret_output(stdout.to_string()).unwrap_err();
        assert_eq!(err.category, TransportCategory::EmptyResult);
    }

    #[test]
    fn test_envelope_error_is_classified() {
        let stdout = r#"{"type":"result","is_error":true,"result":"API Error: 429 rate limit exceeded"}"#;
        let err = interpret_output(stdout.to_string()).unwrap_err();
        assert_eq!(err.category, TransportCategory::RateLimited);

        let stdout = r#"{"type":"result","is_error":true,"result":"Invalid API key"}"#;
        let err = interpret_output(stdout.to_string()).unwrap_err();
        assert_eq!(err.category, TransportCategory::AuthInvalid);
    }

    #[test]
    fn test_envelope_with_prose_result_is_handed_through() {
        let stdout = r#"{"result":"I cannot answer that."}"#;
        let value = interpret_output(stdout.to_string()).unwrap();
        assert_eq!(value, Value::String("I cannot answer that.".to_string()));
    }

    #[test]
    fn test_bare_json_without_envelope() {
        let value = interpret_output(r#"{"final_recommendation": "Monolith"}"#.to_string()).unwrap();
        assert_eq!(value["final_recommendation"], "Monolith");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_classified_from_stderr() {
        let dir = TempDir::new().unwrap();
        let binary = fake_cli(
            dir.path(),
            "claude",
            "echo 'Error: 403 permission denied for model' >&2\nexit 1",
        );

        let err = generator(binary).generate("prompt", &schema()).await.unwrap_err();
        assert_eq!(err.category, TransportCategory::PermissionDenied);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_falls_back_to_stdout() {
        let dir = TempDir::new().unwrap();
        let binary = fake_cli(
            dir.path(),
            "claude",
            r#"printf '%s\n' '{"is_error":true,"result":"529 overloaded"}'
exit 1"#,
        );

        let err = generator(binary).generate("prompt", &schema()).await.unwrap_err();
        assert_eq!(err.category, TransportCategory::ServerUnavailable);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_stdout_is_empty_result() {
        let dir = TempDir::new().unwrap();
        let binary = fake_cli(dir.path(), "claude", "exit 0");

        let err = generator(binary).generate("prompt", &schema()).await.unwrap_err();
        assert_eq!(err.category, TransportCategory::EmptyResult);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_returns_answer() {
        let dir = TempDir::new().unwrap();
        let binary = fake_cli(
            dir.path(),
            "claude",
            r#"printf '%s\n' '{"type":"result","result":"{\"final_recommendation\": \"Monolith\"}"}'"#,
        );

        let value = generator(binary).generate("prompt", &schema()).await.unwrap();
        assert_eq!(value["final_recommendation"], "Monolith");
    }
}
