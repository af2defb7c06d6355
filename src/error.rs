use std::path::PathBuf;
use thiserror::Error;

/// Failure of a structured-generation stage, as surfaced to the caller of
/// `AnalysisPipeline::run`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Rate limit exceeded (429). The AI service is currently busy. Please wait 30-60 seconds before trying again.")]
    RateLimited { detail: String },

    #[error("Access denied (403). Your API key might not have permission for this model or region.")]
    PermissionDenied { detail: String },

    #[error("Schema validation failed (400). The structured output definition was rejected by the model.")]
    SchemaRejected { detail: String },

    #[error("AI service error (5xx). The model service is experiencing issues. Please try again later.")]
    ServiceUnavailable { detail: String },

    #[error("API key error. Please ensure a valid API key is configured.")]
    AuthInvalid { detail: String },

    #[error("Received an empty response from the AI during {stage}.")]
    EmptyResponse { stage: &'static str },

    #[error("The AI response for {stage} did not match the expected structure: {reason}")]
    ParseFailure { stage: &'static str, reason: String },

    #[error("{message}")]
    Transport { message: String },
}

impl GenerationError {
    /// Whether re-invoking the same run may succeed without outside changes.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::ServiceUnavailable { .. }
                | GenerationError::EmptyResponse { .. }
                | GenerationError::ParseFailure { .. }
                | GenerationError::Transport { .. }
        )
    }

    /// Short machine-readable name of the subkind
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::RateLimited { .. } => "rate_limited",
            GenerationError::PermissionDenied { .. } => "permission_denied",
            GenerationError::SchemaRejected { .. } => "schema_rejected",
            GenerationError::ServiceUnavailable { .. } => "service_unavailable",
            GenerationError::AuthInvalid { .. } => "auth_invalid",
            GenerationError::EmptyResponse { .. } => "empty_response",
            GenerationError::ParseFailure { .. } => "parse_failure",
            GenerationError::Transport { .. } => "transport",
        }
    }
}

/// Local precondition failure. Never reaches a generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a problem statement.")]
    EmptyProblem,

    #[error("Weight for {dimension} is {value}; weights must be between 0 and 100.")]
    WeightOutOfRange { dimension: String, value: u8 },
}

/// Everything `AnalysisPipeline::run` can fail with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl AnalysisError {
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Validation(_) => false,
            AnalysisError::Generation(e) => e.is_retryable(),
        }
    }
}

/// Category a structured-generation backend signals when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCategory {
    RateLimited,
    PermissionDenied,
    MalformedRequest,
    ServerUnavailable,
    AuthInvalid,
    EmptyResult,
    Other,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub category: TransportCategory,
    pub message: String,
}

impl TransportError {
    pub fn new(category: TransportCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportCategory::Other, message)
    }

    /// Map onto the pipeline taxonomy; `stage` names the call for empty results.
    pub fn into_generation_error(self, stage: &'static str) -> GenerationError {
        let detail = self.message;
        match self.category {
            TransportCategory::RateLimited => GenerationError::RateLimited { detail },
            TransportCategory::PermissionDenied => GenerationError::PermissionDenied { detail },
            TransportCategory::MalformedRequest => GenerationError::SchemaRejected { detail },
            TransportCategory::ServerUnavailable => GenerationError::ServiceUnavailable { detail },
            TransportCategory::AuthInvalid => GenerationError::AuthInvalid { detail },
            TransportCategory::EmptyResult => GenerationError::EmptyResponse { stage },
            TransportCategory::Other => GenerationError::Transport { message: detail },
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to access history file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
