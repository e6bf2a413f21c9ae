use crate::storage::StorageError;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The token endpoint answered with a non-success status.
    #[error("Authentication failed ({status}): {body}")]
    AuthFailure { status: u16, body: Value },

    /// An authorized request answered with a non-success status.
    #[error("Request failed ({status}): {body}")]
    RequestFailure { status: u16, body: Value },

    /// The error body of a failed call was not JSON.
    #[error("Failed to decode error body ({status}): {source}")]
    ErrorBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to serialize token record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Stored token record is corrupt: {0}")]
    CorruptToken(#[source] serde_json::Error),

    #[error("Endpoint must not be empty")]
    EmptyEndpoint,
}

impl ClientError {
    /// Decoded error body carried by an auth or request failure.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ClientError::AuthFailure { body, .. } | ClientError::RequestFailure { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::AuthFailure { status, .. }
            | ClientError::RequestFailure { status, .. }
            | ClientError::ErrorBody { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
