//! Error types for shape analysis.

use thiserror::Error;

/// Errors raised while classifying a query's shape.
///
/// Every variant means the same thing to the caching layer: the query cannot
/// be cached and must be executed directly against the live source.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The query string was empty or whitespace/comments only.
    #[error("empty query")]
    EmptyQuery,

    /// The query could not be tokenized or parsed.
    #[error("sql syntax error: {0}")]
    Syntax(#[from] sqlparser::parser::ParserError),

    /// The statement parsed but uses a shape the analyzer does not model.
    #[error("unsupported statement shape: {0}")]
    Unsupported(String),
}

impl ShapeError {
    /// Create an unsupported-shape error.
    #[must_use]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

/// A specialized `Result` type for shape analysis.
pub type ShapeResult<T> = std::result::Result<T, ShapeError>;
