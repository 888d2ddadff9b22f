use sea_orm::DbErr;
use thiserror::Error;

/// Failures surfaced by the idea, vote and comment stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Client-correctable input problem. Raised before any write.
    #[error("{0}")]
    Validation(String),

    #[error("Idea {0} not found")]
    IdeaNotFound(i32),

    /// The ledger's unique index rejected a second vote for the same pair.
    #[error("You have already voted for idea {idea_id}")]
    DuplicateVote { idea_id: i32 },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
