//! Frame classification and the display filter.
//!
//! Classification is a pure function from an inbound frame to what the
//! pipeline should do with it: append a synthetic event, reconcile an
//! activity, resync from a backfill, mark an event read, replace the
//! roster, or discard. The display filter is an independently testable
//! predicate so "what is displayable" stays decoupled from "how the store
//! mutates".

use serde_json::Value;
use skylight_proto::{ActivityRecord, EventKind, InboundFrame, PeerSessionRecord, Provider};

/// Where an activity record arrived from.
///
/// The filter is slightly wider for backfill: a backfill snapshot is the
/// authoritative record of past activity and may include gift-derived
/// subscriptions that the live stream intentionally suppresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    /// Streamed over the live channel.
    Live,
    /// Part of a historical backfill snapshot.
    Backfill,
}

/// Why a frame was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The activity did not pass the display filter.
    Filtered,
    /// The tag is not recognized by this build. Never an error; the relay
    /// adds event types over time.
    UnknownTag(String),
    /// Connection-level control frame; the connection manager consumes
    /// these before the feed ever should.
    ConnectionControl,
}

/// What the pipeline should do with an inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Synthetic event: always appended, never deduplicated.
    Test(ActivityRecord),
    /// Displayable live activity for [`EventStore::apply_activity`].
    ///
    /// [`EventStore::apply_activity`]: crate::EventStore::apply_activity
    Activity(ActivityRecord),
    /// Filtered backfill snapshot for [`EventStore::snapshot_replace`].
    ///
    /// [`EventStore::snapshot_replace`]: crate::EventStore::snapshot_replace
    Backfill(Vec<ActivityRecord>),
    /// Mark the event with this identity as read.
    ReadUpdate(String),
    /// Replace the presence roster wholesale.
    Presence(Vec<PeerSessionRecord>),
    /// Drop the frame. Never an error.
    Discard(DiscardReason),
}

/// Classify an inbound frame.
pub fn classify(frame: InboundFrame) -> Classification {
    match frame {
        InboundFrame::EventTest(body) => Classification::Test(synthetic(EventKind::Test, body)),
        InboundFrame::EventTestRoom(body) => {
            Classification::Test(synthetic(EventKind::TestRoom, body))
        },
        InboundFrame::EventRead { identity } => Classification::ReadUpdate(identity),
        InboundFrame::Event(record) => {
            if is_displayable(&record, FilterOrigin::Live) {
                Classification::Activity(record)
            } else {
                Classification::Discard(DiscardReason::Filtered)
            }
        },
        InboundFrame::EventInitial(records) => Classification::Backfill(
            records
                .into_iter()
                .filter(|record| is_displayable(record, FilterOrigin::Backfill))
                .collect(),
        ),
        InboundFrame::ActiveSockets(sessions) => Classification::Presence(sessions),
        InboundFrame::Unknown { tag } => Classification::Discard(DiscardReason::UnknownTag(tag)),
        InboundFrame::Authenticated | InboundFrame::Unauthorized { .. } => {
            Classification::Discard(DiscardReason::ConnectionControl)
        },
    }
}

/// Display filter for activity records.
///
/// The feed is intentionally narrow: it surfaces new-follower and
/// new-subscriber moments, not every raw platform event. An activity is
/// accepted iff it carries a recognized provider and kind, it is not a
/// bulk-gift bundle (one purchase fanning out into many individual
/// subscription events must not be double-counted), and its
/// provider/kind pair is on the allow-list.
pub fn is_displayable(record: &ActivityRecord, origin: FilterOrigin) -> bool {
    // Malformed events are rejected outright.
    if record.provider == Provider::Other || record.kind == EventKind::Unknown {
        return false;
    }

    // Bulk gift bundles are suppressed; only the individual gift-derived
    // follow-up events, if any, are shown.
    if record.gifted() && record.amount() > 1.0 {
        return false;
    }

    match (record.provider, record.kind) {
        (Provider::Youtube, EventKind::Subscriber) | (Provider::Twitch, EventKind::Follow) => true,
        (Provider::Twitch, EventKind::Subscriber) if origin == FilterOrigin::Backfill => {
            record.message().is_some_and(|m| m.contains("gifted"))
        },
        _ => false,
    }
}

/// Build the record for a synthetic diagnostics event.
///
/// Synthetic events carry no identity (they may legitimately repeat) and
/// no creation time; the store assigns their arrival order.
fn synthetic(kind: EventKind, body: Value) -> ActivityRecord {
    ActivityRecord {
        identity: None,
        backfill_identity: None,
        provider: Provider::Other,
        kind,
        created_at: None,
        data: body,
        read: false,
    }
}
