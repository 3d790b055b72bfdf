//! Error types for automerge

use thiserror::Error;

/// Errors produced by automerge
#[derive(Debug, Error)]
pub enum Error {
    /// URL does not have the `/owner/repo/pull/<number>` shape
    #[error("invalid pull request URL: {0}")]
    InvalidPrUrl(String),

    /// Duration string could not be parsed
    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration {
        /// The offending configuration value
        value: String,
        /// Parser message
        reason: String,
    },

    /// GitHub API request failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Configuration could not be loaded or is invalid
    #[error("config error: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Tracking file could not be read or written
    #[error("tracking error: {0}")]
    Tracking(String),

    /// GitHub answered the merge call without merging
    #[error("merge of {pr} was rejected: {message}")]
    MergeRejected {
        /// Pull request display name (`owner/repo#n`)
        pr: String,
        /// Message returned by GitHub
        message: String,
    },

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
