//! Client
//!
//! Action-based connection state machine for the Skylight relay channel.
//! Owns the channel lifecycle: connect, authenticate, disconnect, reconnect
//! on demand.
//!
//! # Architecture
//!
//! The connection manager is Sans-IO: it receives events
//! ([`ConnectionEvent`]), processes them through pure state machine logic,
//! and returns actions ([`ConnectionAction`]) for the caller to execute. The
//! state machine never reconnects or retries on its own; both transport loss
//! and credential rejection are surfaced and left to a user-initiated
//! `connect`, because an aggressively retrying dashboard tab is worse than a
//! stalled one.
//!
//! # Components
//!
//! - [`Connection`]: the lifecycle state machine
//! - [`ConnectionState`]: the five observable lifecycle states
//! - [`ConnectionEvent`]: events fed into the connection
//! - [`ConnectionAction`]: actions produced for the caller
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedRelay`]: frame channels over a WebSocket task
//! - [`transport::connect`]: open a channel to a relay
//! - [`credentials::fetch_relay_token`]: settings-boundary credential fetch

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod connection;
mod error;

#[cfg(feature = "transport")]
pub mod credentials;
#[cfg(feature = "transport")]
pub mod transport;

pub use connection::{Connection, ConnectionAction, ConnectionEvent, ConnectionState};
pub use error::ClientError;
