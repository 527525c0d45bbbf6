//! Errors raised while reading, parsing and building documents

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Document too large: more than {max} nodes")]
    TooManyNodes { max: u32 },

    #[error("Input too large: more than {max} bytes")]
    InputTooLarge { max: usize },
}
