//! Wire shape of a single activity event.
//!
//! The relay's `event` and `event:initial` frames carry these records. Live
//! records identify themselves via `_id`; backfill records carry their stable
//! identity in `SE_ID` instead, which [`ActivityRecord::normalize_identity`]
//! folds into the same field so downstream deduplication always compares one
//! per-record key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source platform of an activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Twitch.
    Twitch,
    /// YouTube.
    Youtube,
    /// Any platform this build does not recognize.
    #[serde(other)]
    #[default]
    Other,
}

/// Category of an activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EventKind {
    /// New follower.
    #[serde(rename = "follow")]
    Follow,
    /// New or renewed subscription.
    #[serde(rename = "subscriber")]
    Subscriber,
    /// A gifted-subscription purchase bundle.
    #[serde(rename = "gift-subscription")]
    GiftSubscription,
    /// Synthetic event emitted from the diagnostics channel.
    #[serde(rename = "test")]
    Test,
    /// Synthetic event scoped to the sender's room.
    #[serde(rename = "test_room")]
    TestRoom,
    /// Any kind this build does not recognize.
    #[serde(other)]
    #[default]
    Unknown,
}

/// One activity event as it appears on the wire.
///
/// Every field except `data` may legitimately be absent: the display filter
/// treats missing provider/kind as malformed and rejects the record, and
/// synthetic events carry no identity at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Stable deduplication key. Live frames populate this directly.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    /// Backfill-side identity. Folded into `identity` during normalization.
    #[serde(rename = "SE_ID", default, skip_serializing_if = "Option::is_none")]
    pub backfill_identity: Option<String>,

    /// Source platform. Defaults to [`Provider::Other`] when absent.
    #[serde(default)]
    pub provider: Provider,

    /// Event category. Defaults to [`EventKind::Unknown`] when absent.
    #[serde(rename = "type", default)]
    pub kind: EventKind,

    /// Creation time in milliseconds since the epoch, when supplied.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Category-specific payload (amount, gifted flag, message, username).
    #[serde(default)]
    pub data: Value,

    /// Read-receipt flag. The store mutates this in place.
    #[serde(default)]
    pub read: bool,
}

impl ActivityRecord {
    /// Fold the backfill identity into the primary identity field.
    ///
    /// Backfill entries carry `SE_ID` instead of `_id`; after normalization
    /// every record exposes its dedupe key through `identity`. A record that
    /// already has a primary identity is left alone.
    pub fn normalize_identity(&mut self) {
        if self.identity.is_none() {
            self.identity = self.backfill_identity.take();
        }
    }

    /// Dedupe key for this record, if it has one.
    ///
    /// Empty strings count as no identity; they cannot be meaningfully
    /// compared.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether the payload marks this event as a gifted contribution.
    pub fn gifted(&self) -> bool {
        self.data.get("gifted").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Contribution multiplicity. Absent amounts count as a single unit.
    pub fn amount(&self) -> f64 {
        self.data.get("amount").and_then(Value::as_f64).unwrap_or(1.0)
    }

    /// Payload message text, when present.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ActivityRecord, EventKind, Provider};

    #[test]
    fn deserializes_live_event() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "_id": "abc123",
            "provider": "twitch",
            "type": "follow",
            "createdAt": 1_694_000_000_000_i64,
            "data": { "username": "viewer" }
        }))
        .unwrap();

        assert_eq!(record.identity(), Some("abc123"));
        assert_eq!(record.provider, Provider::Twitch);
        assert_eq!(record.kind, EventKind::Follow);
        assert_eq!(record.created_at, Some(1_694_000_000_000));
        assert!(!record.read);
    }

    #[test]
    fn unknown_provider_and_kind_fall_through() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "_id": "x",
            "provider": "kick",
            "type": "raid"
        }))
        .unwrap();

        assert_eq!(record.provider, Provider::Other);
        assert_eq!(record.kind, EventKind::Unknown);
    }

    #[test]
    fn normalize_prefers_existing_identity() {
        let mut record: ActivityRecord = serde_json::from_value(json!({
            "_id": "live",
            "SE_ID": "backfill",
            "provider": "twitch",
            "type": "follow"
        }))
        .unwrap();
        record.normalize_identity();
        assert_eq!(record.identity(), Some("live"));

        let mut record: ActivityRecord = serde_json::from_value(json!({
            "SE_ID": "backfill",
            "provider": "twitch",
            "type": "follow"
        }))
        .unwrap();
        record.normalize_identity();
        assert_eq!(record.identity(), Some("backfill"));
    }

    #[test]
    fn empty_identity_is_no_identity() {
        let record: ActivityRecord =
            serde_json::from_value(json!({ "_id": "", "provider": "twitch", "type": "follow" }))
                .unwrap();
        assert_eq!(record.identity(), None);
    }

    #[test]
    fn payload_accessors_default_sanely() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "provider": "twitch",
            "type": "subscriber",
            "data": { "gifted": true, "amount": 3, "message": "gifted 3 subs" }
        }))
        .unwrap();
        assert!(record.gifted());
        assert!((record.amount() - 3.0).abs() < f64::EPSILON);
        assert_eq!(record.message(), Some("gifted 3 subs"));

        let bare: ActivityRecord =
            serde_json::from_value(json!({ "provider": "twitch", "type": "follow" })).unwrap();
        assert!(!bare.gifted());
        assert!((bare.amount() - 1.0).abs() < f64::EPSILON);
        assert_eq!(bare.message(), None);
    }
}
