use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TraceError {
    #[error("frame not found at position {position}")]
    #[diagnostic(help("positions count from 0 at the most recent call"))]
    FrameNotFound { position: usize },

    #[error("frame not found at stack index {stack_index}")]
    #[diagnostic(help("stack indices count from 1 at the oldest visible call"))]
    StackIndexNotFound { stack_index: usize },

    #[error("could not serialize trace: {0}")]
    Serialize(#[from] serde_json::Error),
}
