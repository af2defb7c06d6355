use serde::Deserialize;
use serde_json::Value;

/// Envelope printed by `claude --output-format json`.
///
/// The answer itself sits in `result` and may be bare JSON, fenced in a
/// markdown code block, or embedded in prose.
#[derive(Debug, Deserialize)]
pub struct CliEnvelope {
    pub result: String,
    #[serde(default)]
    pub is_error: bool,
}

/// Parse the CLI envelope; `None` when the output is not an envelope at all
pub fn parse_cli_envelope(raw: &str) -> Option<CliEnvelope> {
    serde_json::from_str::<CliEnvelope>(raw.trim()).ok()
}

/// Extract a JSON object from a string that might contain markdown code blocks
pub fn extract_json(s: &str) -> Option<Value> {
    let trimmed = s.trim();

    // First try: the whole string is valid JSON
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return Some(value);
        }
    }

    // Second try: extract from markdown code block
    let re = regex::Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").ok()?;
    for cap in re.captures_iter(s) {
        let Some(body) = cap.get(1) else { continue };
        if let Ok(value) = serde_json::from_str::<Value>(body.as_str().trim()) {
            if value.is_object() {
                return Some(value);
            }
        }
    }

    // Third try: first balanced object, skipping braces inside strings
    let brace_start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut end = None;

    for (i, c) in s[brace_start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(brace_start + i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    serde_json::from_str::<Value>(&s[brace_start..end?]).ok()
}
