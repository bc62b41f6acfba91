//! Error types for pr-timer

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by pr-timer
#[derive(Debug, Error)]
pub enum Error {
    /// Wait duration could not be used
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// A link was required but is not a pull request link
    #[error("not a pull request link: {0}")]
    NotChangeRequest(String),

    /// Could not obtain credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// GitHub REST/GraphQL failure
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// `gh` CLI invocation failed or returned malformed output
    #[error("gh command failed: {0}")]
    GhCli(String),

    /// Configuration file could not be read or is invalid
    #[error("config error: {0}")]
    Config(String),

    /// Octocrab error
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
