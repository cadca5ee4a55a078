//! Wire protocol for the Skylight relay channel.
//!
//! The relay distributes activity events (follows, subscriptions, presence
//! rosters) to connected dashboard sessions as tagged JSON events: each frame
//! is a `(tag, body)` pair where the tag selects the body shape. This crate
//! models that surface as typed data with no I/O of its own.
//!
//! # Components
//!
//! - [`InboundFrame`]: frames delivered by the relay, decoded from tag + body
//! - [`OutboundFrame`]: frames the dashboard sends (authenticate, backfill
//!   requests, diagnostics)
//! - [`ActivityRecord`]: the wire shape of a single activity event
//! - [`PeerSessionRecord`]: one entry of the presence roster broadcast
//! - [`ApiEnvelope`]: the request/response envelope of the settings boundary
//!
//! Unrecognized tags decode to [`InboundFrame::Unknown`] rather than an
//! error; the relay adds event types over time and old dashboards must keep
//! working.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod activity;
mod error;
mod frame;
mod presence;
mod settings;

pub use activity::{ActivityRecord, EventKind, Provider};
pub use error::ProtocolError;
pub use frame::{AUTH_METHOD_JWT, InboundFrame, OutboundFrame, tags};
pub use presence::PeerSessionRecord;
pub use settings::{ApiEnvelope, StreamElementsSettings};

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
