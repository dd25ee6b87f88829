//! Domain error types
//!
//! This module defines the error hierarchy for Vulnex.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Vulnex error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum VulnexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// GraphQL API errors
    #[error("GraphQL error: {0}")]
    GraphQl(#[from] GraphQlError),

    /// Credential provider errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Archive errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// GraphQL-specific errors
///
/// Errors that occur when talking to the vulnerability GraphQL endpoint.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum GraphQlError {
    /// Failed to connect to the server
    #[error("Failed to connect to GraphQL endpoint: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// The response body was not what we expected
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The response carried a GraphQL `errors` array
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A record could not be flattened
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl GraphQlError {
    /// Map a reqwest error onto the domain error without leaking the type
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GraphQlError::Timeout(err.to_string())
        } else {
            GraphQlError::ConnectionFailed(err.to_string())
        }
    }

    /// Map a non-success HTTP status onto the domain error
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        if status >= 500 {
            GraphQlError::ServerError { status, message }
        } else {
            GraphQlError::ClientError { status, message }
        }
    }
}

/// Credential provider errors
///
/// Every variant is fatal for the run; none of them are retried.
#[derive(Debug, Error)]
pub enum AuthError {
    /// TLS handshake or certificate chain retrieval failed
    #[error("Failed to retrieve certificate chain from {host}: {message}")]
    CertificateFetch { host: String, message: String },

    /// Server presented no certificates
    #[error("Server {0} presented no certificates")]
    EmptyChain(String),

    /// Login request failed
    #[error("Login request failed: {0}")]
    LoginFailed(String),

    /// Login succeeded at the HTTP level but returned no token
    #[error("No access token was generated")]
    NoToken,

    /// The token could not be placed in a header
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for VulnexError {
    fn from(err: std::io::Error) -> Self {
        VulnexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VulnexError {
    fn from(err: serde_json::Error) -> Self {
        VulnexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VulnexError {
    fn from(err: toml::de::Error) -> Self {
        VulnexError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for VulnexError {
    fn from(err: csv::Error) -> Self {
        VulnexError::Csv(err.to_string())
    }
}

impl From<zip::result::ZipError> for VulnexError {
    fn from(err: zip::result::ZipError) -> Self {
        VulnexError::Archive(err.to_string())
    }
}
