//! Error types for the docqa question-answering tool.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, the two external collaborators
//! (search and completion), prompt rendering, and approach preconditions.

use thiserror::Error;

/// Unified error type for docqa.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Collaborator failures (network, auth, quota) are wrapped in the matching
/// variant and propagated unchanged to the caller: there is no retry and no
/// fallback answer anywhere in this layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search service errors
    #[error("Search error: {0}")]
    Search(String),

    /// Completion service errors
    #[error("Completion error: {0}")]
    Completion(String),

    /// Prompt template rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Approach precondition violations (e.g. empty chat history)
    #[error("Approach error: {0}")]
    Approach(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
