//! Error types for PRONOM tools

use thiserror::Error;

/// Result type alias for PRONOM operations
pub type Result<T> = std::result::Result<T, PronomError>;

/// Main error type for PRONOM tools
///
/// `origin` is whatever the failing input was read from: a file path for
/// exported records, a URL for documents fetched from the registry.
#[derive(Error, Debug)]
pub enum PronomError {
    /// The document is not well-formed XML
    #[error("cannot parse xml: {origin}: {message}")]
    Parse { origin: String, message: String },

    /// A required element or attribute is missing from the document
    #[error("cannot process {origin}: missing {field}")]
    FieldExtraction { origin: String, field: String },

    /// A required HTTP call failed or returned a non-success status
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Required credential or address is missing from the environment
    #[error("environment needs configuring: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PronomError {
    /// Create a parse error for the given origin
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create a field extraction error for the given origin
    pub fn missing_field(origin: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldExtraction {
            origin: origin.into(),
            field: field.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error was raised by a document-level problem
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::FieldExtraction { .. })
    }
}
