use std::path::PathBuf;

use crate::analysis::PriorityWeights;

pub fn default_version() -> u32 {
    1
}

pub fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

pub fn default_analysis_model() -> String {
    "gemini-3-flash-preview".to_string()
}

pub fn default_synthesis_model() -> String {
    "gemini-3-pro-preview".to_string()
}

pub fn default_thinking_budget() -> Option<u32> {
    Some(4000)
}

pub fn default_http_timeout_sec() -> u64 {
    120
}

pub fn default_cli_timeout_sec() -> u64 {
    300
}

pub fn default_claude_binary() -> PathBuf {
    // Check common install location first
    if let Some(home) = std::env::var_os("HOME") {
        let local_path = PathBuf::from(home).join(".claude/local/claude");
        if local_path.exists() {
            return local_path;
        }
    }
    PathBuf::from("claude")
}

pub fn default_claude_model() -> String {
    "sonnet".to_string()
}

pub fn default_codex_binary() -> PathBuf {
    PathBuf::from("codex")
}

pub fn default_codex_model() -> String {
    "gpt-4.1".to_string()
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}

pub fn default_history_path() -> PathBuf {
    PathBuf::from(".parthought/history.json")
}

pub fn default_history_capacity() -> usize {
    10
}

pub fn default_true() -> bool {
    true
}

pub fn default_weights() -> PriorityWeights {
    PriorityWeights::default()
}
