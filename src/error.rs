//! Error types for content loading and querying

use thiserror::Error;

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while resolving, loading or querying content
#[derive(Error, Debug)]
pub enum ContentError {
    // Configuration errors
    #[error("No content provider registered")]
    NoProviders,

    #[error("No content provider supports the type \"{0}\"")]
    UnsupportedType(String),

    #[error("No provider factory supports the \"{kind}\" provider configured for type \"{type_name}\"")]
    NoProviderFactory { type_name: String, kind: String },

    #[error("No denormalizer supports the type \"{0}\"")]
    NoDenormalizer(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Lookup errors
    #[error("No content found for type \"{type_name}\" and id \"{id}\"")]
    NotFound { type_name: String, id: String },

    // Decoding errors
    #[error("Failed to decode {format} content: {message}")]
    Decode { format: String, message: String },

    #[error("No decoder supports the \"{0}\" format")]
    UnsupportedFormat(String),

    // Pipeline errors
    #[error("Processor {name} failed on \"{slug}\": {message}")]
    Processor {
        name: String,
        slug: String,
        message: String,
    },

    #[error("Failed to denormalize \"{slug}\" into type \"{type_name}\": {source}")]
    Denormalize {
        type_name: String,
        slug: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Content \"{slug}\" of type \"{type_name}\" references itself while loading")]
    CircularReference { type_name: String, slug: String },

    #[error("Cached instance for type \"{0}\" does not have the requested Rust type")]
    TypeMismatch(String),

    // Query errors
    #[error("Cannot read property \"{path}\": {message}")]
    Property { path: String, message: String },

    #[error("Cannot compare {left} with {right}")]
    Incomparable { left: String, right: String },

    #[error("Failed to filter contents of type \"{type_name}\": {source}")]
    Filter {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to sort contents of type \"{type_name}\": {source}")]
    Sort {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    // Ambient errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ContentError {
    /// Whether this error comes from configuration rather than content
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ContentError::NoProviders
                | ContentError::UnsupportedType(_)
                | ContentError::NoProviderFactory { .. }
                | ContentError::NoDenormalizer(_)
                | ContentError::InvalidFilter(_)
                | ContentError::InvalidSort(_)
                | ContentError::InvalidConfig(_)
        )
    }
}
