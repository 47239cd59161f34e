use thiserror::Error;

/// Structural failures that abort a pipeline run.
///
/// Data-quality problems (nulls, duplicate ids, bad prices) are never
/// reported through this type; they end up in the
/// [`QualityReport`](crate::quality::QualityReport) instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A transaction date could not be parsed into a calendar timestamp.
    #[error("transaction {transaction_id}: unparseable transaction_date '{value}'")]
    InvalidTimestamp {
        transaction_id: String,
        value: String,
    },

    #[error("CSV ingestion failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
