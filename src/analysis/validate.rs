//! Boundary checks on decoded model output that serde alone cannot express

use super::types::{Dimension, PerspectiveSet, Synthesis};

const CONFIDENCE_RANGE: std::ops::RangeInclusive<i64> = 1..=10;
const KEY_POINTS: usize = 3;

/// Checks applied to a decoded `PerspectiveSet`. Only strict mode has any.
pub fn check_perspectives(set: &PerspectiveSet, strict: bool) -> Result<(), String> {
    if !strict {
        return Ok(());
    }

    for (dimension, assessment) in set.iter() {
        if !CONFIDENCE_RANGE.contains(&assessment.confidence) {
            return Err(format!(
                "{}.confidence is {}, expected 1-10",
                dimension, assessment.confidence
            ));
        }
        if assessment.key_points.len() != KEY_POINTS {
            return Err(format!(
                "{}.key_points has {} entries, expected {}",
                dimension,
                assessment.key_points.len(),
                KEY_POINTS
            ));
        }
        if assessment.metrics.is_empty() {
            return Err(format!("{}.metrics is empty", dimension));
        }
    }

    Ok(())
}

/// Non-empty reasoning chain and action plan are always required.
pub fn check_synthesis(synthesis: &Synthesis, strict: bool) -> Result<(), String> {
    if synthesis.reasoning_chain.is_empty() {
        return Err("reasoning_chain is empty".to_string());
    }
    if synthesis.action_plan.is_empty() {
        return Err("action_plan is empty".to_string());
    }

    if !strict {
        return Ok(());
    }

    if !CONFIDENCE_RANGE.contains(&synthesis.confidence) {
        return Err(format!(
            "confidence is {}, expected 1-10",
            synthesis.confidence
        ));
    }

    let missing: Vec<_> = Dimension::ALL
        .iter()
        .filter(|d| !synthesis.outcomes.contains_key(*d))
        .map(|d| d.key())
        .collect();
    if !missing.is_empty() {
        return Err(format!("outcomes missing for {}", missing.join(", ")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_perspectives, sample_synthesis};

    #[test]
    fn test_sample_payloads_pass_strict() {
        assert!(check_perspectives(&sample_perspectives(), true).is_ok());
        assert!(check_synthesis(&sample_synthesis(), true).is_ok());
    }

    #[test]
    fn test_confidence_out_of_range() {
        let mut set = sample_perspectives();
        set.cost.confidence = 11;
        let err = check_perspectives(&set, true).unwrap_err();
        assert!(err.contains("cost.confidence"));
        assert!(check_perspectives(&set, false).is_ok());
    }

    #[test]
    fn test_key_points_cardinality() {
        let mut set = sample_perspectives();
        set.developer.key_points.pop();
        assert!(check_perspectives(&set, true).is_err());
    }

    #[test]
    fn test_empty_action_plan_rejected_even_when_lenient() {
        let mut synthesis = sample_synthesis();
        synthesis.action_plan.clear();
        assert_eq!(
            check_synthesis(&synthesis, false),
            Err("action_plan is empty".to_string())
        );
    }

    #[test]
    fn test_missing_outcomes_in_strict_mode() {
        let mut synthesis = sample_synthesis();
        synthesis.outcomes.remove(&Dimension::Business);
        let err = check_synthesis(&synthesis, true).unwrap_err();
        assert!(err.contains("business"));
        assert!(check_synthesis(&synthesis, false).is_ok());
    }
}
