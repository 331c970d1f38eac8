//! Errors that end an update cycle as `Decision::Failed`.

use crate::compiler::CompileError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Staged download has zero bytes (missing, or an empty download).
    #[error("staged download {key:?} is empty")]
    EmptyInput { key: String },
    /// Declared checksum is malformed or does not match the content.
    #[error("checksum mismatch: declared {declared}, computed {computed}")]
    IntegrityFailure { declared: String, computed: String },
    #[error("compile failed: {0}")]
    Compilation(#[from] CompileError),
    #[error("storage failed: {0}")]
    Storage(#[from] StoreError),
}

impl PipelineError {
    /// Storage I/O errors may clear up on their own; the others repeat for
    /// the same task and staged bytes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Storage(StoreError::Io { .. }))
    }
}
