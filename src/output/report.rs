use crate::analysis::{priority_order, AnalysisResult, Dimension, ScenarioRecord};
use crate::error::OutputError;
use std::fs;
use std::path::Path;

/// Render a full analysis as markdown
pub fn render_markdown(result: &AnalysisResult) -> String {
    let synthesis = &result.synthesis;
    let mut content = String::new();

    // Header
    content.push_str("# Decision Analysis\n\n");
    content.push_str(&format!("**Problem:** {}\n\n", result.problem));
    if !result.context.is_empty() {
        content.push_str(&format!("**Context:** {}\n\n", result.context));
    }
    content.push_str(&format!(
        "**Priorities:** {}\n\n",
        priority_order(&result.weights)
    ));

    // Perspective overview table
    content.push_str("| Perspective | Recommendation | Confidence |\n");
    content.push_str("|-------------|----------------|------------|\n");
    for (dimension, assessment) in result.perspectives.iter() {
        content.push_str(&format!(
            "| {} | {} | {}/10 |\n",
            dimension.persona(),
            assessment.recommendation,
            assessment.confidence
        ));
    }
    content.push_str("\n---\n\n");

    content.push_str("## Perspectives\n\n");
    for (dimension, assessment) in result.perspectives.iter() {
        content.push_str(&format!(
            "### {} ({})\n\n",
            dimension.persona(),
            dimension
        ));
        content.push_str(&format!("**{}**\n\n", assessment.recommendation));
        content.push_str(&format!("{}\n\n", assessment.reasoning));

        for point in &assessment.key_points {
            content.push_str(&format!("- {}\n", point));
        }
        content.push('\n');

        if !assessment.metrics.is_empty() {
            for metric in &assessment.metrics {
                content.push_str(&format!("- **{}:** {}\n", metric.label, metric.value));
            }
            content.push('\n');
        }
    }

    content.push_str("---\n\n");
    content.push_str("## Synthesis\n\n");
    content.push_str(&format!(
        "**{}** (confidence {}/10)\n\n",
        synthesis.final_recommendation, synthesis.confidence
    ));

    content.push_str("### Reasoning\n\n");
    for (i, step) in synthesis.reasoning_chain.iter().enumerate() {
        content.push_str(&format!("{}. {}\n", i + 1, step));
    }
    content.push('\n');

    if !synthesis.consensus_points.is_empty() {
        content.push_str("### Consensus\n\n");
        for point in &synthesis.consensus_points {
            content.push_str(&format!("- {}\n", point));
        }
        content.push('\n');
    }

    if !synthesis.conflicts_resolved.is_empty() {
        content.push_str("### Conflicts Resolved\n\n");
        for conflict in &synthesis.conflicts_resolved {
            content.push_str(&format!(
                "- **{}:** {}\n",
                conflict.conflict, conflict.resolution
            ));
            if let Some(tradeoff) = &conflict.tradeoff {
                content.push_str(&format!("  - Tradeoff: {}\n", tradeoff));
            }
        }
        content.push('\n');
    }

    content.push_str("### Action Plan\n\n");
    for step in &synthesis.action_plan {
        content.push_str(&format!("- [ ] {}\n", step));
    }
    content.push('\n');

    if !synthesis.outcomes.is_empty() {
        content.push_str("### Predicted Outcomes\n\n");
        for dimension in Dimension::ALL {
            if let Some(outcome) = synthesis.outcomes.get(&dimension) {
                content.push_str(&format!("- **{}:** {}\n", dimension, outcome));
            }
        }
        content.push('\n');
    }

    content
}

/// One line per history entry, most recent first
pub fn render_history(records: &[ScenarioRecord]) -> String {
    if records.is_empty() {
        return "No saved scenarios\n".to_string();
    }

    let mut content = String::new();
    for record in records {
        let verdict = record
            .result
            .as_ref()
            .map(|r| r.synthesis.final_recommendation.as_str())
            .unwrap_or("-");
        content.push_str(&format!(
            "{}  {}  {}  => {}\n",
            record.id,
            record.timestamp.format("%Y-%m-%d %H:%M"),
            truncate(&record.problem, 60),
            verdict
        ));
    }
    content
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Write the markdown report, plus the raw result as JSON next to it
pub fn write_report(path: &Path, result: &AnalysisResult) -> Result<(), OutputError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(OutputError::CreateDir)?;
    }

    fs::write(path, render_markdown(result)).map_err(OutputError::WriteReport)?;

    let json_path = path.with_extension("json");
    let json = serde_json::to_string_pretty(result)?;
    fs::write(json_path, json).map_err(OutputError::WriteReport)?;

    Ok(())
}
