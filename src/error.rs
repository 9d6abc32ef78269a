// External crates
use polars::error::PolarsError;
use thiserror::Error;

/// Error taxonomy for the forecasting pipeline. Every variant is fatal for
/// the run that raised it; there is no retry or partial-result recovery.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("insufficient history: need at least {needed} rows, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    #[error("data error: {0}")]
    Data(String),

    #[error("empty partition: {0}")]
    EmptyPartition(String),

    #[error("scaler used before fit")]
    NotFitted,

    #[error("sequence length {seq_len} must be smaller than available rows {rows}")]
    SequenceLength { seq_len: usize, rows: usize },

    #[error("training failure: {0}")]
    Training(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
