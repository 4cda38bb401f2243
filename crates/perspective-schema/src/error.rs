//! Error types for perspective-schema

use std::path::PathBuf;

/// Result type for perspective-schema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or validating a declared perspective
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Config file too large: {path} is {size} bytes (max {max})")]
    ConfigTooLarge { path: PathBuf, size: u64, max: u64 },

    /// The perspective itself has no name
    #[error("Required name field")]
    MissingName,

    /// A group was declared without a name
    #[error("Group at position {index} has no name")]
    MissingGroupName { index: usize },

    /// Group names identify groups across reorders, so they must be unique
    #[error("Two groups share the name '{name}'")]
    DuplicateGroupName { name: String },

    /// A rule was declared without an asset kind
    #[error("Rule {rule} of group '{group}' has no asset")]
    MissingAsset { group: String, rule: usize },

    #[error("Unknown group type: {value}. Expected filter or categorize")]
    UnknownGroupType { value: String },

    #[error("Unknown combine_with value: {value}. Expected and or or")]
    UnknownCombineWith { value: String },

    #[error("Unknown constant type: {value}")]
    UnknownConstantType { value: String },

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
