/// Convenience result type used across snapfx.
pub type SnapResult<T> = Result<T, SnapError>;

/// Error type returned by snapfx operations.
#[derive(thiserror::Error, Debug)]
pub enum SnapError {
    /// Invalid configuration, detected at construction time.
    #[error("configuration error: {0}")]
    Config(String),

    /// The capture collaborator could not produce a pixel buffer yet.
    #[error("capture not ready: {0}")]
    NotReady(String),

    /// Caller-supplied data that does not describe a valid raster or canvas.
    #[error("invalid input: {0}")]
    Input(String),

    /// A snap cycle is already running or has completed without a reset.
    #[error("snap already in progress")]
    AlreadyInProgress,

    /// Pixel buffer or codec failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Background worker failure.
    #[error("worker error: {0}")]
    Worker(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapError {
    /// Build a [`SnapError::Config`] error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SnapError::NotReady`] error.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build a [`SnapError::Input`] error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`SnapError::Encode`] error.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SnapError::Worker`] error.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
