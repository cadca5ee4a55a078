//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the feed runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use skylight_proto::{InboundFrame, OutboundFrame};

use crate::projection::FeedView;

/// User intents fed into the runtime.
///
/// These are the actions a dashboard surface exposes: the connect toggle,
/// the backfill refresh control, and the diagnostics emitter.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    /// Connect to the relay (also retry after a rejection).
    Connect,
    /// Tear the channel down.
    Disconnect,
    /// Disconnect followed by connect.
    Reconnect,
    /// Request a backfill anchored at a timestamp (ms since epoch).
    RefreshBackfill {
        /// Anchor timestamp.
        date: i64,
    },
    /// Emit an ad-hoc diagnostics event.
    EmitTest {
        /// Arbitrary payload echoed by the relay.
        payload: serde_json::Value,
    },
    /// Shut the session down.
    Quit,
}

/// Abstracts I/O operations for the feed runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic, so the same
/// orchestration code runs against a real relay transport and in tests.
pub trait Driver {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next user intent.
    ///
    /// Returns an intent when one is ready, or `None` when there is nothing
    /// pending.
    fn poll_intent(&mut self)
    -> impl Future<Output = Result<Option<UserIntent>, Self::Error>>;

    /// Receive the next frame from the relay.
    ///
    /// Returns `None` once the transport has dropped.
    fn recv_frame(&mut self) -> impl Future<Output = Option<InboundFrame>>;

    /// Send a frame to the relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is closed or the send fails.
    fn send_frame(&mut self, frame: OutboundFrame)
    -> impl Future<Output = Result<(), Self::Error>>;

    /// Open the transport to the relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be established.
    fn open_transport(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Tear the transport down and release its resources.
    fn close_transport(&mut self);

    /// Whether a transport is currently up.
    fn is_connected(&self) -> bool;

    /// Render the projected view.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &FeedView) -> Result<(), Self::Error>;

    /// Surface a credential rejection to the user.
    fn notify_auth_rejected(&mut self, detail: &str);
}
