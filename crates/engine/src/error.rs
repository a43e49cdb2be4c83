use rankqueue_core::error::CoreError;

/// Error type for engine operations.
///
/// Eligibility and validation failures surface as [`CoreError`] unchanged;
/// storage failures wrap [`sqlx::Error`]. Optimistic-conflict exhaustion is
/// reported as [`CoreError::Conflict`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
