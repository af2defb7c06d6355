use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;
use crate::analysis::PriorityWeights;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Which structured-generation backend to use
    #[serde(default)]
    pub provider: Provider,

    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Caller-side retry policy (only used when `--retries` is given)
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    /// Weights used when none are given on the command line
    #[serde(default = "default_weights")]
    pub default_weights: PriorityWeights,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    Gemini,
    ClaudeCli,
    CodexCli,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::ClaudeCli => write!(f, "claude_cli"),
            Provider::CodexCli => write!(f, "codex_cli"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub claude_cli: ClaudeCliConfig,

    #[serde(default)]
    pub codex_cli: CodexCliConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Falls back to GEMINI_API_KEY, then API_KEY
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,

    #[serde(default = "default_synthesis_model")]
    pub synthesis_model: String,

    #[serde(default = "default_thinking_budget")]
    pub synthesis_thinking_budget: Option<u32>,

    #[serde(default = "default_http_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            api_key: None,
            analysis_model: default_analysis_model(),
            synthesis_model: default_synthesis_model(),
            synthesis_thinking_budget: default_thinking_budget(),
            timeout_sec: default_http_timeout_sec(),
        }
    }
}

impl GeminiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ClaudeCliConfig {
    #[serde(default = "default_claude_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_claude_model")]
    pub model: String,

    #[serde(default = "default_cli_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            model: default_claude_model(),
            timeout_sec: default_cli_timeout_sec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CodexCliConfig {
    #[serde(default = "default_codex_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_codex_model")]
    pub model: String,

    #[serde(default = "default_cli_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for CodexCliConfig {
    fn default() -> Self {
        Self {
            binary: default_codex_binary(),
            model: default_codex_model(),
            timeout_sec: default_cli_timeout_sec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct HistoryConfig {
    /// Where completed scenarios are kept
    #[serde(default = "default_history_path")]
    pub path: PathBuf,

    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            capacity: default_history_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ValidationConfig {
    /// Enforce confidence ranges and list cardinalities on model output
    #[serde(default = "default_true")]
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: default_true(),
        }
    }
}
