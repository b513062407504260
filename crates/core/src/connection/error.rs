//! Error types for the connection layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The configured server URL cannot be turned into a socket endpoint.
    #[error("Invalid server endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The socket handshake failed.
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// A send was attempted while the connection is not open.
    #[error("Connection is not open")]
    NotOpen,

    /// The outbound request could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Type alias for Result with ConnectionError.
pub type ConnectionResult<T> = Result<T, ConnectionError>;
