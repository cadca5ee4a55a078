//! Client error types.
//!
//! Strongly typed per failure site: establishing the transport, streaming
//! frames over it, and fetching the relay credential from the settings
//! boundary. None of these are fatal to the caller; the worst outcome is a
//! stalled feed recoverable by a user-triggered reconnect.

use thiserror::Error;

/// Errors produced by the connection manager and its transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport was established but a frame exchange failed.
    #[error("stream error: {0}")]
    Stream(String),

    /// A frame could not be encoded for the wire.
    #[error("codec error: {0}")]
    Codec(String),

    /// The relay credential could not be obtained from the settings boundary.
    #[error("credentials unavailable: {0}")]
    Credentials(String),
}
