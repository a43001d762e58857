use thiserror::Error;

/// Top-level error taxonomy for the bibliometric backend (spec §7).
#[derive(Debug, Error)]
pub enum BibscopeError {
    /// Malformed request body, empty required field, out-of-range numeric.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown job id, unknown export format, unknown algorithm.
    #[error("not found: {0}")]
    NotFound(String),

    /// An adapter failed or timed out. Recorded on the job, never fatal by itself.
    #[error("source error ({source_id}): {detail}")]
    Source { source_id: String, detail: String },

    /// Disk or encoding failure writing artifacts. Fatal for the job.
    #[error("export error: {0}")]
    Export(String),

    /// Model failed to load, numerical failure (all-zero vectors, etc).
    #[error("computation error: {0}")]
    Computation(String),

    /// Cancel requested after running began.
    #[error("job cancelled: {0}")]
    Cancelled(String),

    /// Cancel called on a job already in a terminal state.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BibscopeError {
    /// Build a `Computation` error from any displayable failure (model load
    /// failures, numerical faults) without the caller naming the variant.
    pub fn computation(detail: impl std::fmt::Display) -> Self {
        Self::Computation(detail.to_string())
    }

    /// Whether this error should be recorded but allows the job to continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Source { .. })
    }

    /// Whether this error is fatal to the job that produced it.
    pub fn is_fatal_to_job(&self) -> bool {
        matches!(self, Self::Export(_) | Self::Computation(_))
    }
}

pub type Result<T> = std::result::Result<T, BibscopeError>;
