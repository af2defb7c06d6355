//! Embedded prompt templates and their rendering

use super::types::{Dimension, PerspectiveSet, PriorityWeights};

const PERSPECTIVES_TEMPLATE: &str = include_str!("../../prompts/perspectives.md");
const SYNTHESIS_TEMPLATE: &str = include_str!("../../prompts/synthesis.md");

/// Substitute `{{NAME}}` placeholders in one pass.
///
/// Substituted values are never rescanned, so user text containing
/// `{{CONTEXT}}` stays literal. Unknown placeholders are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn dimension_keys() -> String {
    Dimension::ALL
        .iter()
        .map(|d| d.key())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn perspectives_prompt(problem: &str, context: &str) -> String {
    let perspective_list = Dimension::ALL
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {}", i + 1, d.focus()))
        .collect::<Vec<_>>()
        .join("\n");
    let keys = dimension_keys();

    render(
        PERSPECTIVES_TEMPLATE,
        &[
            ("PROBLEM", problem),
            ("CONTEXT", context),
            ("PERSPECTIVES", &perspective_list),
            ("KEYS", &keys),
        ],
    )
}

/// `cost (100) > security (80) > ...`
pub fn priority_order(weights: &PriorityWeights) -> String {
    weights
        .ranked()
        .iter()
        .map(|(d, w)| format!("{} ({})", d, w))
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn synthesis_prompt(
    problem: &str,
    perspectives: &PerspectiveSet,
    weights: &PriorityWeights,
) -> Result<String, serde_json::Error> {
    let perspectives_json = serde_json::to_string(perspectives)?;
    let weights_json = serde_json::to_string(weights)?;
    let order = priority_order(weights);
    let keys = dimension_keys();

    Ok(render(
        SYNTHESIS_TEMPLATE,
        &[
            ("PROBLEM", problem),
            ("PERSPECTIVES_JSON", &perspectives_json),
            ("WEIGHTS_JSON", &weights_json),
            ("PRIORITY_ORDER", &order),
            ("KEYS", &keys),
        ],
    ))
}
