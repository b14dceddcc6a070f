use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("X API rate limit exceeded")]
    RateLimited,

    #[error("X API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid bearer token format")]
    InvalidToken,

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
