//! Error types for element records
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for record operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for element records
#[derive(Error, Debug)]
pub enum Error {
    /// Container directory lookup failed
    #[error("Container lookup error: {0}")]
    ContainerLookup(String),

    /// Element query service failed
    #[error("Element query error: {0}")]
    ElementQuery(String),

    /// Element create/update was rejected or failed
    #[error("Element write error: {0}")]
    ElementWrite(String),

    /// Attribute registry listing failed
    #[error("Attribute registry error: {0}")]
    AttributeRegistry(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The record has no resolved container
    #[error("Record is not bound to a container")]
    NotBound,

    /// Attribute name is outside the container's allowlist (strict mode only)
    #[error("Attribute not allowed for container {container:?}: {name}")]
    DisallowedAttribute {
        /// Rejected attribute name
        name: String,
        /// Container the record is bound to
        container: Option<u64>,
    },

    /// A persisted record carries no usable `ID` field
    #[error("Persisted record has no valid ID field")]
    MissingIdentifier,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a container lookup error
    pub fn container_lookup(msg: impl Into<String>) -> Self {
        Self::ContainerLookup(msg.into())
    }

    /// Create an element query error
    pub fn element_query(msg: impl Into<String>) -> Self {
        Self::ElementQuery(msg.into())
    }

    /// Create an element write error
    pub fn element_write(msg: impl Into<String>) -> Self {
        Self::ElementWrite(msg.into())
    }

    /// Create an attribute registry error
    pub fn attribute_registry(msg: impl Into<String>) -> Self {
        Self::AttributeRegistry(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a disallowed attribute error
    pub fn disallowed(name: impl Into<String>, container: Option<u64>) -> Self {
        Self::DisallowedAttribute {
            name: name.into(),
            container,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error came from one of the external services
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Self::ContainerLookup(_)
                | Self::ElementQuery(_)
                | Self::ElementWrite(_)
                | Self::AttributeRegistry(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
