//! Error types for wire decoding.
//!
//! Decode failures are deliberately narrow: an unknown tag is *not* an error
//! (forward compatibility), only a recognized tag with a body that cannot be
//! interpreted is. Callers treat these as drop-and-log, never fatal.

use thiserror::Error;

/// Errors produced while decoding relay frames or settings responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A recognized tag arrived with a body that does not match its shape.
    #[error("malformed body for tag {tag:?}: {reason}")]
    MalformedBody {
        /// Frame tag the body arrived under.
        tag: String,
        /// Human-readable decode failure.
        reason: String,
    },

    /// A read-receipt frame arrived without the identity it must target.
    #[error("read receipt missing target identity")]
    MissingIdentity,

    /// The settings boundary reported failure or returned no settings.
    #[error("settings unavailable: {reason}")]
    SettingsUnavailable {
        /// Message from the settings service, if any.
        reason: String,
    },
}
