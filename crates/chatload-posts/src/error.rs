//! Error types for the post fabrication pipeline.

use thiserror::Error;

/// Errors from the membership API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP transport or status error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Login was rejected or returned no session token.
    #[error("login failed: {0}")]
    Login(String),
}

/// Errors that abort a post-load run.
#[derive(Error, Debug)]
pub enum PostLoadError {
    /// MySQL connection or statement error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// Membership API error.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
