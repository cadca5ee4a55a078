//! Session side-effects and intents.
//!
//! This module defines the [`SessionAction`] enum, the instructions produced
//! by the [`crate::FeedSession`] state machine for the runtime to execute.

use skylight_proto::OutboundFrame;

/// Actions produced by the feed session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Open the transport to the relay.
    OpenTransport,

    /// Tear the transport down immediately.
    CloseTransport,

    /// Send a frame to the relay.
    Send(OutboundFrame),

    /// Render the projected view.
    Render,

    /// Surface a credential rejection to the user.
    AuthRejected {
        /// Error detail supplied by the relay.
        detail: String,
    },
}
