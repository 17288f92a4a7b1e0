use thiserror::Error;

/// Failure produced by a caller-supplied callback (fetch, predicate, observer, handler).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type ToolRefreshResult<T> = Result<T, ToolRefreshError>;

#[derive(Debug, Error)]
pub enum ToolRefreshError {
    #[error("refresh predicate failed: {0}")]
    Predicate(#[source] BoxError),
    #[error("failed to fetch replacement tools: {0}")]
    Fetch(#[source] BoxError),
    #[error("refresh observer failed: {0}")]
    Observer(#[source] BoxError),
    #[error("step handler failed: {0}")]
    Handler(#[source] BoxError),
}

impl ToolRefreshError {
    pub fn handler(error: impl Into<BoxError>) -> Self {
        ToolRefreshError::Handler(error.into())
    }
}
