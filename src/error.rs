//! Error types for conversions
//!
//! - **Format**: wrong scheme prefix, malformed link, missing or invalid port.
//! - **Decode**: base64, zlib, UTF-8 or JSON parsing failure; carries the underlying message.
//! - **Conversion**: a JSON path required to build a link is absent or has the wrong shape.
//! - **Io**: reading input in the command-line layer.

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur while converting between representations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Input does not have the expected shape (scheme, port)
    #[error("Format error: {0}")]
    Format(String),
    /// Payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
    /// Configuration lacks a field needed for a link
    #[error("Conversion error: {0}")]
    Conversion(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl LinkError {
    /// Conversion error for a JSON path that could not be located.
    pub(crate) fn missing(path: &str) -> Self {
        LinkError::Conversion(format!("cannot locate '{}'", path))
    }
}

impl From<base64::DecodeError> for LinkError {
    fn from(err: base64::DecodeError) -> Self {
        LinkError::Decode(format!("Base64 decode error: {}", err))
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::Decode(format!("JSON decode error: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for LinkError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        LinkError::Decode(format!("UTF-8 decode error: {}", err))
    }
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Io(err.to_string())
    }
}
