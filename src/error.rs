// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("network middleware error: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("could not locate the file behind '{0}'")]
    Unresolvable(String),
    #[error("writing '{path}' failed: {source}")]
    WriteFailure {
        path: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("interrupted by user")]
    UserInterrupt,
    #[error("{0}")]
    UserInputError(String),
    #[error("unexpected error: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Errors that must stop the whole run instead of a single candidate or course.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::AuthFailed(_) | AppError::UserInterrupt)
    }
}

pub type AppResult<T> = Result<T, AppError>;
