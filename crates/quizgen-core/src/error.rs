//! Error taxonomy for user-visible pipeline failures.
//!
//! Recoverable conditions (an unparseable generator payload, one bad
//! element in a batch) are handled inside the sanitizer/builder and never
//! become a `QuizError`. What surfaces here is what a caller must react
//! to, with a stable machine-readable kind alongside the message.

use thiserror::Error;

/// Failures surfaced by engine operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller's input was malformed or empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The generation call errored or produced nothing usable. Fatal for
    /// regeneration; recovered with an empty set during course creation.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Sanitized generator output still was not valid structured data.
    #[error("unparseable generator output: {0}")]
    Parse(String),

    /// A write conflicted with concurrent state (e.g. duplicate user).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed. Internals are wrapped, not exposed.
    #[error("storage error: {0}")]
    Store(String),
}

impl QuizError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        QuizError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code for clients; messages may change,
    /// these do not.
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::NotFound { .. } => "not_found",
            QuizError::InvalidInput(_) => "invalid_input",
            QuizError::Generation(_) => "generation_failed",
            QuizError::Parse(_) => "parse_failed",
            QuizError::Conflict(_) => "conflict",
            QuizError::Store(_) => "store",
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
