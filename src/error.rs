use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Analytics backend failure. Recovered by the pipeline as a failed report.
    #[error("{0}")]
    Backend(String),

    #[error("Malformed backend payload: {0}")]
    MalformedPayload(String),

    #[error("LLM error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
