//! Two-stage orchestration: perspectives, then weighted synthesis

use crate::error::{AnalysisError, ValidationError};
use crate::history::HistoryStore;
use crate::provider::StageGenerators;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::analyzer::PerspectiveAnalyzer;
use super::synthesizer::Synthesizer;
use super::types::{AnalysisResult, PriorityWeights};

/// Coarse progress of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Analyzing,
    Synthesizing,
    Completing,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Analyzing => write!(f, "analyzing"),
            PipelineState::Synthesizing => write!(f, "synthesizing"),
            PipelineState::Completing => write!(f, "completing"),
        }
    }
}

pub struct AnalysisPipeline {
    analyzer: PerspectiveAnalyzer,
    synthesizer: Synthesizer,
    history: Arc<HistoryStore>,
    state: watch::Sender<PipelineState>,
}

impl AnalysisPipeline {
    pub fn new(generators: StageGenerators, history: Arc<HistoryStore>, strict: bool) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            analyzer: PerspectiveAnalyzer::new(generators.analysis, strict),
            synthesizer: Synthesizer::new(generators.synthesis, strict),
            history,
            state,
        }
    }

    /// Progress updates for the current run
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    fn transition(&self, next: PipelineState) {
        let previous = self.state.send_replace(next);
        debug!("Pipeline {} -> {}", previous, next);
    }

    /// Run both stages. Callers serialize runs; no partial result is ever returned.
    pub async fn run(
        &self,
        problem: &str,
        context: &str,
        weights: PriorityWeights,
    ) -> Result<AnalysisResult, AnalysisError> {
        if problem.trim().is_empty() {
            return Err(ValidationError::EmptyProblem.into());
        }
        weights.validate()?;

        self.transition(PipelineState::Analyzing);
        let perspectives = match self.analyzer.analyze(problem, context).await {
            Ok(perspectives) => perspectives,
            Err(e) => {
                warn!("Analysis failed while {}: {}", self.state(), e);
                self.transition(PipelineState::Idle);
                return Err(e.into());
            }
        };

        self.transition(PipelineState::Synthesizing);
        let synthesis = match self
            .synthesizer
            .synthesize(problem, &perspectives, weights)
            .await
        {
            Ok(synthesis) => synthesis,
            Err(e) => {
                warn!("Synthesis failed while {}: {}", self.state(), e);
                self.transition(PipelineState::Idle);
                return Err(e.into());
            }
        };

        self.transition(PipelineState::Completing);
        let result = AnalysisResult {
            problem: problem.to_string(),
            context: context.to_string(),
            perspectives,
            synthesis,
            weights,
        };

        match self.history.record(&result).await {
            Ok(record) => info!("Recorded scenario {}", record.id),
            Err(e) => warn!("Failed to persist history: {}", e),
        }

        self.transition(PipelineState::Idle);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, TransportCategory, TransportError};
    use crate::history::DEFAULT_CAPACITY;
    use crate::testing::{perspectives_json, synthesis_json, StubGenerator};

    struct Harness {
        pipeline: AnalysisPipeline,
        analysis: Arc<StubGenerator>,
        synthesis: Arc<StubGenerator>,
    }

    fn harness(
        analysis: Vec<Result<serde_json::Value, TransportError>>,
        synthesis: Vec<Result<serde_json::Value, TransportError>>,
    ) -> Harness {
        let analysis = Arc::new(StubGenerator::new(analysis));
        let synthesis = Arc::new(StubGenerator::new(synthesis));
        let generators = StageGenerators {
            analysis: analysis.clone(),
            synthesis: synthesis.clone(),
        };
        let history = Arc::new(HistoryStore::in_memory(DEFAULT_CAPACITY));
        Harness {
            pipeline: AnalysisPipeline::new(generators, history, true),
            analysis,
            synthesis,
        }
    }

    fn happy() -> Harness {
        harness(vec![Ok(perspectives_json())], vec![Ok(synthesis_json())])
    }

    #[tokio::test]
    async fn test_end_to_end_with_canned_payloads() {
        let h = happy();
        let result = h
            .pipeline
            .run("Should we migrate?", "Legacy system", PriorityWeights::default())
            .await
            .unwrap();

        assert_eq!(
            result.synthesis.final_recommendation,
            "Strangler-fig migration to microservices"
        );
        assert_eq!(result.perspectives.security.confidence, 8);
        assert_eq!(result.weights, PriorityWeights::default());
        assert_eq!(h.pipeline.state(), PipelineState::Idle);

        let history = h.pipeline.history().snapshot().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].result.as_ref(), Some(&result));
    }

    #[tokio::test]
    async fn test_blank_problem_makes_no_calls() {
        let h = happy();
        for problem in ["", "   \n\t"] {
            let err = h
                .pipeline
                .run(problem, "ctx", PriorityWeights::default())
                .await
                .unwrap_err();
            assert_eq!(err, AnalysisError::Validation(ValidationError::EmptyProblem));
        }
        assert_eq!(h.analysis.calls(), 0);
        assert_eq!(h.synthesis.calls(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_weight_makes_no_calls() {
        let h = happy();
        let mut weights = PriorityWeights::default();
        weights.cost = 101;

        let err = h.pipeline.run("p", "", weights).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Validation(ValidationError::WeightOutOfRange { .. })
        ));
        assert_eq!(h.analysis.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_analysis_skips_synthesis() {
        let h = harness(
            vec![Err(TransportError::new(
                TransportCategory::RateLimited,
                "429 quota exceeded",
            ))],
            vec![Ok(synthesis_json())],
        );

        let err = h
            .pipeline
            .run("Should we migrate?", "", PriorityWeights::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::Generation(GenerationError::RateLimited {
                detail: "429 quota exceeded".to_string()
            })
        );
        assert_eq!(h.analysis.calls(), 1);
        assert_eq!(h.synthesis.calls(), 0);
        assert_eq!(h.pipeline.state(), PipelineState::Idle);
        assert!(h.pipeline.history().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_synthesis_records_nothing() {
        let mut payload = synthesis_json();
        payload
            .as_object_mut()
            .unwrap()
            .remove("final_recommendation");
        let h = harness(vec![Ok(perspectives_json())], vec![Ok(payload)]);

        let err = h
            .pipeline
            .run("Should we migrate?", "", PriorityWeights::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Generation(GenerationError::ParseFailure { stage: "synthesis", .. })
        ));
        assert!(err.is_retryable());
        assert!(h.pipeline.history().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_history_keeps_last_ten_most_recent_first() {
        let h = happy();
        for i in 0..12 {
            h.pipeline
                .run(&format!("problem {}", i), "", PriorityWeights::default())
                .await
                .unwrap();
        }

        let history = h.pipeline.history().snapshot().await;
        let problems: Vec<_> = history.iter().map(|r| r.problem.clone()).collect();
        let expected: Vec<_> = (2..12).rev().map(|i| format!("problem {}", i)).collect();
        assert_eq!(problems, expected);
        assert_eq!(h.analysis.calls(), 12);
    }

    #[tokio::test]
    async fn test_subscribers_see_run_return_to_idle() {
        let h = happy();
        let mut rx = h.pipeline.subscribe();
        assert!(!rx.has_changed().unwrap());

        h.pipeline
            .run("Should we migrate?", "", PriorityWeights::default())
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), PipelineState::Idle);
    }
}
