//! Relay channel frames.
//!
//! Every frame on the channel is a `(tag, body)` pair. Inbound decoding is
//! tag-driven: the tag selects a body shape, a recognized tag with an
//! uninterpretable body is a [`ProtocolError::MalformedBody`] (drop-and-log
//! territory for the caller), and an unrecognized tag decodes to
//! [`InboundFrame::Unknown`] so future relay event types never break the
//! pipeline.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ActivityRecord, PeerSessionRecord, error::ProtocolError};

/// Credential kind for the authentication handshake.
pub const AUTH_METHOD_JWT: &str = "jwt";

/// Frame tags used on the relay channel.
pub mod tags {
    /// Authentication handshake accepted.
    pub const AUTHENTICATED: &str = "authenticated";
    /// Authentication handshake rejected.
    pub const UNAUTHORIZED: &str = "unauthorized";
    /// Single live activity event.
    pub const EVENT: &str = "event";
    /// Historical backfill snapshot.
    pub const EVENT_INITIAL: &str = "event:initial";
    /// Read receipt for a previously delivered event.
    pub const EVENT_READ: &str = "event:read";
    /// Synthetic diagnostics event.
    pub const EVENT_TEST: &str = "event:test";
    /// Synthetic diagnostics event scoped to the sender's room.
    pub const EVENT_TEST_ROOM: &str = "event:test_room";
    /// Full presence roster broadcast.
    pub const ACTIVE_SOCKETS: &str = "active-sockets";
    /// Outbound authentication handshake.
    pub const AUTHENTICATE: &str = "authenticate";
    /// Outbound backfill request anchored at a timestamp.
    pub const REFRESH_DATE: &str = "refresh-date";
    /// Outbound ad-hoc diagnostics emission.
    pub const TEST: &str = "test";
}

/// Body of an `event:read` frame.
#[derive(Debug, Deserialize)]
struct ReadReceipt {
    #[serde(rename = "_id", default)]
    identity: Option<String>,
}

/// A frame delivered by the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// The authentication handshake was accepted.
    Authenticated,

    /// The authentication handshake was rejected.
    Unauthorized {
        /// Error detail supplied by the relay.
        detail: String,
    },

    /// One live activity event.
    Event(ActivityRecord),

    /// Historical backfill snapshot, authoritative over live events.
    EventInitial(Vec<ActivityRecord>),

    /// Read receipt targeting the event with the given identity.
    EventRead {
        /// Identity of the event that was read.
        identity: String,
    },

    /// Synthetic diagnostics event. Never deduplicated.
    EventTest(Value),

    /// Synthetic diagnostics event scoped to the sender's room.
    EventTestRoom(Value),

    /// Full presence roster snapshot.
    ActiveSockets(Vec<PeerSessionRecord>),

    /// A tag this build does not recognize. Dropped downstream, never an
    /// error.
    Unknown {
        /// The unrecognized tag.
        tag: String,
    },
}

impl InboundFrame {
    /// Decode a `(tag, body)` pair into a typed frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedBody`] when a recognized tag carries
    /// a body that does not match its shape, and
    /// [`ProtocolError::MissingIdentity`] for a read receipt without a
    /// target. Unrecognized tags are not errors.
    pub fn decode(tag: &str, body: Value) -> Result<Self, ProtocolError> {
        match tag {
            tags::AUTHENTICATED => Ok(Self::Authenticated),
            tags::UNAUTHORIZED => Ok(Self::Unauthorized { detail: detail_text(&body) }),
            tags::EVENT => {
                let record: ActivityRecord = decode_body(tag, body)?;
                Ok(Self::Event(record))
            },
            tags::EVENT_INITIAL => {
                let mut records: Vec<ActivityRecord> = decode_body(tag, body)?;
                // Backfill entries carry SE_ID; expose one identity field.
                for record in &mut records {
                    record.normalize_identity();
                }
                Ok(Self::EventInitial(records))
            },
            tags::EVENT_READ => {
                let receipt: ReadReceipt = decode_body(tag, body)?;
                match receipt.identity.filter(|id| !id.is_empty()) {
                    Some(identity) => Ok(Self::EventRead { identity }),
                    None => Err(ProtocolError::MissingIdentity),
                }
            },
            tags::EVENT_TEST => Ok(Self::EventTest(body)),
            tags::EVENT_TEST_ROOM => Ok(Self::EventTestRoom(body)),
            tags::ACTIVE_SOCKETS => {
                let sessions: Vec<PeerSessionRecord> = decode_body(tag, body)?;
                Ok(Self::ActiveSockets(sessions))
            },
            other => Ok(Self::Unknown { tag: other.to_owned() }),
        }
    }
}

/// A frame the dashboard sends to the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// Authentication handshake, sent immediately on transport connect.
    Authenticate {
        /// Credential kind, [`AUTH_METHOD_JWT`] in practice.
        method: String,
        /// Bearer credential.
        token: String,
    },

    /// Request a backfill snapshot anchored at a timestamp.
    RefreshDate {
        /// Anchor timestamp in milliseconds since the epoch.
        date: i64,
    },

    /// Ad-hoc diagnostics emission.
    Test {
        /// Arbitrary payload echoed by the relay.
        payload: Value,
    },
}

impl OutboundFrame {
    /// Authentication handshake with the standard credential kind.
    pub fn authenticate(token: impl Into<String>) -> Self {
        Self::Authenticate { method: AUTH_METHOD_JWT.to_owned(), token: token.into() }
    }

    /// Encode into the `(tag, body)` pair the relay expects.
    pub fn encode(&self) -> (&'static str, Value) {
        match self {
            Self::Authenticate { method, token } => {
                (tags::AUTHENTICATE, json!({ "method": method, "token": token }))
            },
            Self::RefreshDate { date } => (tags::REFRESH_DATE, json!({ "date": date })),
            Self::Test { payload } => (tags::TEST, payload.clone()),
        }
    }
}

/// Detail text of an `unauthorized` body: the string itself when the relay
/// sends one, otherwise the raw JSON.
fn detail_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(
    tag: &str,
    body: Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(body).map_err(|e| ProtocolError::MalformedBody {
        tag: tag.to_owned(),
        reason: e.to_string(),
    })
}
