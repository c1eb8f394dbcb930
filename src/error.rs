//! Error types for the Bamboo provider.

use thiserror::Error;

/// Errors returned by [`BambooClient`](crate::client::BambooClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("Invalid response code from server: {0}")]
    UnexpectedStatus(u16),

    /// The response body was not a JSON object of user records.
    #[error("Failed to decode users response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The authorization header could not be built.
    #[error("Invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ClientError {
    /// The HTTP status carried by an [`ClientError::UnexpectedStatus`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors that can occur while serving provider requests.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A data source was read before the provider was configured.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The requested data source type is unknown.
    #[error("Unknown data source type: {0}")]
    UnknownDataSource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The upstream API call failed.
    #[error("Unable to read Bamboo users: {0}")]
    Client(#[from] ClientError),
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::NotConfigured(msg)
            | Self::UnknownDataSource(msg) => msg.clone(),
            Self::Serialization(err) => err.to_string(),
            Self::Client(err) => err.to_string(),
        }
    }
}
