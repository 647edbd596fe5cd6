//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Note: String errors default to `General`. The domain specific string
/// variants must be constructed explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed JSON (schema files).
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Failures talking to the Strapi SQLite database, or missing rows.
    #[from(ignore)]
    #[display("Database Error: {_0}")]
    Database(String),

    /// Problems with the project `.env` file.
    #[from(ignore)]
    #[display("Environment Error: {_0}")]
    Env(String),

    /// Content-type schema files that are missing or do not have the expected shape.
    #[from(ignore)]
    #[display("Schema Error: {_0}")]
    Schema(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<diesel::ConnectionError> for AppError {
    fn from(err: diesel::ConnectionError) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
