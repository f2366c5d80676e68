//! Domain error types
//!
//! This module defines the error hierarchy for the exporter. Errors returned
//! by the HTTP adapters are mapped into [`TransportError`] so that callers
//! never see third-party client types.

use thiserror::Error;

/// Main exporter error type
///
/// Every fallible operation in the crate returns this type. Returning one
/// from [`crate::core::export::ExportCoordinator::execute_export`] means the
/// whole run was aborted; per-application failures are reported as data in
/// the run results instead.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session acquisition or API key rejected
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// HTTP transport errors from the console or knowledge API
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ExporterError {
    /// Whether the error came from authenticating against a remote service
    pub fn is_authentication(&self) -> bool {
        matches!(self, ExporterError::Authentication(_))
    }

    /// Whether the error came from the network layer
    pub fn is_transport(&self) -> bool {
        matches!(self, ExporterError::Transport(_))
    }
}

/// HTTP transport errors
///
/// Raised by the console and knowledge API clients on network failures and
/// non-2xx responses.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to reach the server
    #[error("Failed to connect: {0}")]
    ConnectionFailed(String),

    /// Response body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl TransportError {
    /// Map a non-success HTTP status and its body to a transport error
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => TransportError::NotFound(message),
            500..=599 => TransportError::ServerError { status, message },
            _ => TransportError::ClientError { status, message },
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_decode() {
            TransportError::InvalidResponse(err.to_string())
        } else {
            TransportError::ConnectionFailed(err.to_string())
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}
