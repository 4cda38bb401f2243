//! Error types for perspective-client

/// Result type for perspective-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Outcomes of a remote call other than success
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Perspective not found: {id}")]
    NotFound { id: String },

    #[error("A perspective named '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Authentication error with the perspective API")]
    Authentication,

    #[error("Unexpected response from the perspective API: HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Created perspective but could not extract its id from response: {body}")]
    UnparseableCreateResponse { body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
