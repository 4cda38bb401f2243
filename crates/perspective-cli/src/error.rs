//! Error types for perspective-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from perspective-core
    #[error(transparent)]
    Core(#[from] perspective_core::Error),

    /// Error from perspective-schema, mostly config loading
    #[error(transparent)]
    Schema(#[from] perspective_schema::Error),

    /// Error from the API client
    #[error(transparent)]
    Client(#[from] perspective_client::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
