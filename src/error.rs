//! Error types for the edges of the expression IR.
//!
//! The rewriting engine itself has no recoverable failure modes. Errors only
//! arise when building nodes from caller-supplied parts, when a checked rewrite
//! refuses a tree that is too deep, or at the JSON boundary (diagnostic dumps
//! and rewrite options).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExprError {
    #[error("`In` expression requires at least one argument")]
    EmptyInArgs,

    #[error("`In` value tuple {index} has {found} elements, expected {expected}")]
    RaggedTuple {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("expression depth {depth} exceeds the configured limit of {limit}")]
    DepthLimitExceeded { depth: usize, limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExprResult<T> = Result<T, ExprError>;
