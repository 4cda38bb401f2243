//! Error types for perspective-core

use perspective_schema::GroupType;

/// Result type for perspective-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classes of failure, none of which are retried by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local, deterministic problem with the declared configuration
    Validation,
    /// A rule points at a group that does not exist
    Reference,
    /// A rule's type disagrees with its group's type
    TypeMismatch,
    /// Outcome reported by the remote API client
    Remote,
    /// Local filesystem or encoding problem
    Io,
}

/// Errors that can occur while reconciling or translating perspectives
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A previously observed or declared ref id is not an integer string
    #[error("Group with non integer ref_id: {ref_id}")]
    MalformedRefId { ref_id: String },

    /// Two declared groups resolved to the same ref id
    #[error("Two groups with the same name: {name}")]
    DuplicateName { name: String },

    /// A group reached translation without a ref id
    #[error("Group '{name}' has no ref_id; reconcile before translating")]
    UnreconciledGroup { name: String },

    #[error("Unknown rule type: {value}. Expected filter or categorize")]
    UnknownRuleType { value: String },

    /// A wire rule carries neither a target nor a self-identifier
    #[error("Unable to find 'to' for {asset} rule")]
    RuleWithoutTarget { asset: String },

    #[error("Group reference {ref_id} not found")]
    UnresolvedGroupReference { ref_id: String },

    #[error("Rule of type {rule_type} targets group {ref_id} of type {group_type}")]
    RuleTypeMismatch {
        ref_id: String,
        rule_type: GroupType,
        group_type: GroupType,
    },

    #[error("Invalid include_in_reports value: {value}")]
    InvalidBoolean { value: String },

    // Transparent wrappers for underlying crate errors
    /// Declared configuration error from perspective-schema
    #[error(transparent)]
    Schema(#[from] perspective_schema::Error),

    /// Remote error from perspective-client
    #[error(transparent)]
    Client(#[from] perspective_client::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedRefId { .. }
            | Error::DuplicateName { .. }
            | Error::UnreconciledGroup { .. }
            | Error::UnknownRuleType { .. }
            | Error::InvalidBoolean { .. } => ErrorKind::Validation,
            Error::RuleWithoutTarget { .. } | Error::UnresolvedGroupReference { .. } => {
                ErrorKind::Reference
            }
            Error::RuleTypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Client(_) => ErrorKind::Remote,
            Error::Schema(perspective_schema::Error::Io { .. })
            | Error::Schema(perspective_schema::Error::ConfigNotFound { .. }) => ErrorKind::Io,
            Error::Schema(_) => ErrorKind::Validation,
            Error::Io(_) | Error::Json(_) | Error::TomlDe(_) | Error::TomlSer(_) => ErrorKind::Io,
        }
    }

    /// Whether the remote reported the perspective as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Client(e) if e.is_not_found())
    }
}
