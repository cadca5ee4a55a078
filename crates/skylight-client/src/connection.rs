//! Connection lifecycle state machine.
//!
//! This module defines the [`Connection`] state machine, which owns the
//! lifecycle of one relay channel completely decoupled from I/O: connect,
//! authenticate, disconnect, reconnect on demand.
//!
//! This is a pure state machine: it consumes [`ConnectionEvent`] inputs and
//! produces [`ConnectionAction`] instructions for the caller to execute.
//!
//! # Policies
//!
//! - Credential rejection is surfaced and the channel stays up,
//!   unauthenticated. There is no retry; re-invoking `connect` is the retry.
//! - Transport loss lands in [`ConnectionState::Disconnected`] with no
//!   reconnect action. Reconnection policy belongs to the caller.
//! - Credential refresh tears the channel down and recreates it; an
//!   authenticated channel is never re-authenticated in place.

use skylight_proto::{InboundFrame, OutboundFrame};

/// Connection state.
///
/// Owned exclusively by [`Connection`]; every other component reads it and
/// never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No channel, or the channel was torn down.
    Disconnected,
    /// Transport open in progress.
    Connecting,
    /// Transport up but not authenticated (initial, or credential rejected).
    Connected,
    /// Authentication handshake sent, awaiting the relay's verdict.
    Authenticating,
    /// Handshake accepted; data frames are trustworthy.
    Authenticated,
}

/// Events fed into the connection state machine.
///
/// The caller is responsible for running the transport and forwarding its
/// lifecycle edges and decoded frames here.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// The transport finished opening.
    TransportUp,

    /// The transport dropped (network loss or remote close).
    TransportDown,

    /// A decoded frame arrived from the relay.
    Frame(InboundFrame),
}

/// Actions the connection produces for the caller to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionAction {
    /// Open the transport to the relay.
    OpenTransport,

    /// Tear the transport down immediately.
    CloseTransport,

    /// Send a frame to the relay.
    Send(OutboundFrame),

    /// Forward a data frame to the feed layer.
    Deliver(InboundFrame),

    /// The relay rejected the credential. The channel stays up,
    /// unauthenticated; retrying is the caller's decision.
    AuthRejected {
        /// Error detail supplied by the relay.
        detail: String,
    },
}

/// Relay connection lifecycle manager.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a relay.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Lifecycle state.
    state: ConnectionState,
    /// Bearer credential for the authentication handshake.
    token: String,
}

impl Connection {
    /// Create a new connection with the given bearer credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self { state: ConnectionState::Disconnected, token: token.into() }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the authentication handshake has completed.
    pub fn is_authenticated(&self) -> bool {
        self.state == ConnectionState::Authenticated
    }

    /// Initiate a connection.
    ///
    /// From [`ConnectionState::Disconnected`] this opens a fresh transport.
    /// From any live state it tears the existing channel down first: this is
    /// also the retry path after a credential rejection, and re-running the
    /// handshake on a live channel is never attempted.
    pub fn connect(&mut self) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();
        if self.state != ConnectionState::Disconnected {
            actions.push(ConnectionAction::CloseTransport);
        }
        self.state = ConnectionState::Connecting;
        actions.push(ConnectionAction::OpenTransport);
        actions
    }

    /// Tear the channel down immediately.
    pub fn disconnect(&mut self) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Disconnected {
            return vec![];
        }
        self.state = ConnectionState::Disconnected;
        vec![ConnectionAction::CloseTransport]
    }

    /// Disconnect followed by connect.
    pub fn reconnect(&mut self) -> Vec<ConnectionAction> {
        let mut actions = self.disconnect();
        actions.extend(self.connect());
        actions
    }

    /// Swap the bearer credential, recreating the channel if one is live.
    ///
    /// An existing authenticated channel is never mutated in place; the
    /// refreshed credential only takes effect through a fresh handshake.
    pub fn refresh_credential(&mut self, token: impl Into<String>) -> Vec<ConnectionAction> {
        self.token = token.into();
        if self.state == ConnectionState::Disconnected {
            return vec![];
        }
        self.reconnect()
    }

    /// Process a transport or frame event and return actions.
    pub fn handle(&mut self, event: ConnectionEvent) -> Vec<ConnectionAction> {
        match event {
            ConnectionEvent::TransportUp => self.handle_transport_up(),
            ConnectionEvent::TransportDown => {
                // Transport loss is terminal for this channel; reconnecting
                // is a user decision, not ours.
                self.state = ConnectionState::Disconnected;
                vec![]
            },
            ConnectionEvent::Frame(frame) => self.handle_frame(frame),
        }
    }

    fn handle_transport_up(&mut self) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Disconnected {
            // A transport that finished opening after the user disconnected
            // is stale; close it rather than adopting it.
            return vec![ConnectionAction::CloseTransport];
        }
        self.state = ConnectionState::Authenticating;
        vec![ConnectionAction::Send(OutboundFrame::authenticate(self.token.clone()))]
    }

    fn handle_frame(&mut self, frame: InboundFrame) -> Vec<ConnectionAction> {
        match frame {
            InboundFrame::Authenticated => {
                self.state = ConnectionState::Authenticated;
                vec![]
            },
            InboundFrame::Unauthorized { detail } => {
                // Channel stays up, unauthenticated. No retry here: auto
                // retrying a bad credential risks a reconnect storm against
                // the relay.
                self.state = ConnectionState::Connected;
                vec![ConnectionAction::AuthRejected { detail }]
            },
            data => vec![ConnectionAction::Deliver(data)],
        }
    }
}
