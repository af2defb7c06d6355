use crate::analysis::{AnalysisPipeline, AnalysisResult, PriorityWeights, ScenarioRecord};
use crate::error::AnalysisError;
use crate::share;
use regex::Regex;
use tracing::debug;

/// Reduce rich-text input to its plain text.
///
/// Only a `<` that opens a tag, closing tag or comment starts markup, so
/// comparisons like `p99 < 50ms` pass through untouched.
pub fn strip_markup(input: &str) -> String {
    let text = match Regex::new(r"<[A-Za-z/!][^>]*>") {
        Ok(re) => re.replace_all(input, "").into_owned(),
        Err(_) => input.to_string(),
    };
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// The user's working state: current inputs and the last result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub problem: String,
    pub context: String,
    pub weights: PriorityWeights,
    pub result: Option<AnalysisResult>,
}

impl Session {
    pub fn new(weights: PriorityWeights) -> Self {
        Self {
            weights,
            ..Default::default()
        }
    }

    /// Replace inputs and result with those of a history entry
    pub fn load_scenario(&mut self, record: &ScenarioRecord) {
        self.problem = record.problem.clone();
        self.context = record.context.clone();
        self.weights = record.weights;
        self.result = record.result.clone();
    }

    /// Seed inputs from a share link, keeping current values for missing fields
    pub fn apply_share_link(&mut self, link: &str) {
        let shared = share::decode(link);
        debug!("Applying share link: {:?}", shared);

        if let Some(problem) = shared.problem {
            self.problem = problem;
        }
        if let Some(context) = shared.context {
            self.context = context;
        }
        if let Some(weights) = shared.weights {
            self.weights = weights;
        }
    }

    pub fn share_query(&self) -> Result<String, serde_json::Error> {
        share::encode(&self.problem, &self.context, &self.weights)
    }

    /// Run the pipeline on the current inputs, stripped of markup.
    ///
    /// The previous result is cleared first and only replaced on success.
    pub async fn analyze(
        &mut self,
        pipeline: &AnalysisPipeline,
    ) -> Result<&AnalysisResult, AnalysisError> {
        self.result = None;
        let problem = strip_markup(&self.problem);
        let context = strip_markup(&self.context);

        let result = pipeline.run(&problem, &context, self.weights).await?;
        Ok(self.result.insert(result))
    }
}
