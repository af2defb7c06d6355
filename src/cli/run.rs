use crate::cli::{OutputFormat, RunArgs};
use anyhow::Context;
use parthought::analysis::{AnalysisPipeline, AnalysisResult};
use parthought::config::{Config, RetryConfig};
use parthought::error::{AnalysisError, ValidationError};
use parthought::history::HistoryStore;
use parthought::output::{render_markdown, write_report};
use parthought::provider::create_generators;
use parthought::runner::retry_with_backoff;
use parthought::session::{strip_markup, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    // Load and validate config
    info!("Loading config from {:?}", args.config);
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    // Seed the session: defaults, then share link, then explicit flags
    let mut session = Session::new(config.default_weights);
    if let Some(link) = &args.share {
        session.apply_share_link(link);
    }
    if let Some(problem) = read_input(args.problem, args.problem_file)? {
        session.problem = problem;
    }
    if let Some(context) = read_input(args.context, args.context_file)? {
        session.context = context;
    }
    if let Some(overrides) = &args.weights {
        session.weights = session
            .weights
            .with_overrides(overrides)
            .map_err(anyhow::Error::msg)?;
    }

    // A blank problem never needs a backend
    if strip_markup(&session.problem).is_empty() {
        return Err(ValidationError::EmptyProblem.into());
    }

    let generators = create_generators(&config)?;
    let history = Arc::new(HistoryStore::load(
        &config.history.path,
        config.history.capacity,
    ));
    let pipeline = AnalysisPipeline::new(generators, history, config.validation.strict);
    info!("Using provider {}", config.provider);

    let max_attempts = match (args.retries, args.retry) {
        (Some(retries), _) => retries.saturating_add(1),
        (None, true) => config.retry.max_attempts,
        (None, false) => 1,
    };

    let result: &AnalysisResult = if max_attempts > 1 {
        let policy = RetryConfig {
            max_attempts,
            backoff_base_ms: config.retry.backoff_base_ms,
        };
        let problem = strip_markup(&session.problem);
        let context = strip_markup(&session.context);
        let weights = session.weights;

        let result = retry_with_backoff(&policy, AnalysisError::is_retryable, || {
            pipeline.run(&problem, &context, weights)
        })
        .await?;
        session.result.insert(result)
    } else {
        session.analyze(&pipeline).await?
    };

    match args.format {
        OutputFormat::Text => print!("{}", render_markdown(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }

    if let Some(path) = &args.output {
        write_report(path, result)?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}

/// Inline text wins; otherwise read the file if one was given
fn read_input(inline: Option<String>, file: Option<PathBuf>) -> anyhow::Result<Option<String>> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Some(text))
        }
        (None, None) => Ok(None),
    }
}
