// Error types for blogem.
// Covers HTTP failures from the blog API, configuration, and terminal IO.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BlogError>;
