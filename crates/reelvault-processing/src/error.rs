use crate::validator::ValidationError;
use reelvault_storage::StorageError;

/// Ingestion failures. Every variant aborts the pipeline after staged files are released.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-zero exit, timeout, spawn failure or unparseable output
    #[error("{tool} failed: {detail}")]
    ToolFailure { tool: &'static str, detail: String },

    #[error("No decodable media stream: {0}")]
    UnprobeableMedia(String),

    #[error("{tool} produced an empty output file")]
    EmptyOutput { tool: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Asset store failure: {0}")]
    Upload(#[from] StorageError),
}

pub type IngestResult<T> = Result<T, IngestError>;
