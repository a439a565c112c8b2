use thiserror::Error;

use crate::llm::ApiError;

/// Everything that can go wrong while translating a single file.
///
/// These never abort a run; the processor turns them into a failed
/// outcome whose `error` field is this type's `Display` output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("file not found")]
    FileNotFound,

    #[error("read error: {0}")]
    FileRead(String),

    #[error("write error: {0}")]
    FileWrite(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A task panicked past the per-file boundary.
    #[error("task fault: {0}")]
    TaskFault(String),
}
