//! In-memory event store and reconciler.
//!
//! Maintains the ordered collection of activity events for one session.
//! Reconciliation rules:
//!
//! - At most one event per non-empty identity. A later event with the same
//!   identity replaces the earlier one in place (content swap; the view
//!   position is recomputed from `received_order`, not the insertion index).
//! - Read receipts mutate `read` in place and no-op on unknown identities: a
//!   receipt may legitimately race ahead of backfill delivery.
//! - Backfill snapshots are authoritative and replace the store wholesale,
//!   deliberately dropping events that were provisionally shown from the
//!   live stream before the backfill confirmed them.
//!
//! Events are never destroyed; they persist for the life of the session,
//! and identity-replacement is a content swap, not a deletion.

use std::collections::HashSet;

use serde_json::Value;
use skylight_proto::{ActivityRecord, EventKind, Provider};

/// One reconciled activity event.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    /// Stable deduplication key. `None` for synthetic events, which are
    /// never identity-compared.
    pub identity: Option<String>,
    /// Source platform.
    pub provider: Provider,
    /// Event category.
    pub kind: EventKind,
    /// Category-specific payload.
    pub payload: Value,
    /// Ordering value: the supplied creation time when the wire had one,
    /// otherwise a store-assigned monotonic arrival value.
    pub received_order: i64,
    /// Read-receipt flag, mutated in place.
    pub read: bool,
}

/// Ordered, deduplicated collection of activity events.
#[derive(Debug, Default)]
pub struct EventStore {
    /// Events in arrival order. Identity replacement swaps content in the
    /// original slot so equal-order ties keep first-arrival position.
    events: Vec<ActivityEvent>,
    /// Monotonic fallback for records without a creation time.
    arrival_counter: i64,
}

impl EventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Look up an event by identity.
    pub fn get(&self, identity: &str) -> Option<&ActivityEvent> {
        self.events.iter().find(|e| e.identity.as_deref() == Some(identity))
    }

    /// Insert or reconcile one activity record.
    ///
    /// A record whose non-empty identity is already present replaces the
    /// stored event in place with the newcomer's content (including its
    /// `read` flag). Identity-less records always append. Applying the
    /// same record twice leaves the store in the same observable state as
    /// applying it once: a replacement without a wire creation time keeps
    /// the order the original was assigned.
    pub fn apply_activity(&mut self, record: ActivityRecord) {
        let identity = record.identity().map(str::to_owned);

        if let Some(id) = &identity
            && let Some(existing) = self.events.iter_mut().find(|e| e.identity.as_deref() == Some(id))
        {
            existing.provider = record.provider;
            existing.kind = record.kind;
            existing.payload = record.data;
            existing.read = record.read;
            if let Some(created_at) = record.created_at {
                existing.received_order = created_at;
            }
            return;
        }

        let received_order = match record.created_at {
            Some(created_at) => created_at,
            None => self.next_arrival(),
        };

        self.events.push(ActivityEvent {
            identity,
            provider: record.provider,
            kind: record.kind,
            payload: record.data,
            received_order,
            read: record.read,
        });
    }

    /// Mark the event with this identity as read.
    ///
    /// Unknown identities are a no-op, not an error: the receipt may have
    /// raced ahead of the backfill that will deliver its target.
    pub fn apply_read_update(&mut self, identity: &str) {
        match self.events.iter_mut().find(|e| e.identity.as_deref() == Some(identity)) {
            Some(event) => event.read = true,
            None => tracing::debug!(identity, "read receipt for unknown event, ignoring"),
        }
    }

    /// Replace the store's contents with a backfill snapshot.
    ///
    /// The backfill is authoritative: everything accumulated so far is
    /// discarded, including events provisionally shown from the live
    /// stream. The input is deduplicated by per-record identity, first
    /// occurrence winning.
    pub fn snapshot_replace(&mut self, records: Vec<ActivityRecord>) {
        self.events.clear();

        let mut seen = HashSet::new();
        for record in records {
            if let Some(id) = record.identity()
                && !seen.insert(id.to_owned())
            {
                continue;
            }
            self.apply_activity(record);
        }
    }

    /// Events sorted by `received_order` descending, most recent first.
    ///
    /// The sort is stable, so equal-order events keep their arrival order.
    pub fn ordered(&self) -> Vec<&ActivityEvent> {
        let mut ordered: Vec<&ActivityEvent> = self.events.iter().collect();
        ordered.sort_by(|a, b| b.received_order.cmp(&a.received_order));
        ordered
    }

    fn next_arrival(&mut self) -> i64 {
        self.arrival_counter += 1;
        self.arrival_counter
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use skylight_proto::ActivityRecord;

    use super::EventStore;

    fn follow(id: &str, created_at: i64) -> ActivityRecord {
        serde_json::from_value(json!({
            "_id": id,
            "provider": "twitch",
            "type": "follow",
            "createdAt": created_at,
            "data": { "username": "viewer" }
        }))
        .unwrap()
    }

    fn synthetic() -> ActivityRecord {
        serde_json::from_value(json!({ "type": "test", "data": "ping" })).unwrap()
    }

    #[test]
    fn appends_new_events() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 1));
        store.apply_activity(follow("b", 2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn same_identity_replaces_in_place() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 1));

        let mut updated = follow("a", 9);
        updated.data = json!({ "username": "renamed" });
        store.apply_activity(updated);

        assert_eq!(store.len(), 1);
        let event = store.get("a").unwrap();
        assert_eq!(event.received_order, 9);
        assert_eq!(event.payload["username"], "renamed");
    }

    #[test]
    fn replacement_uses_later_events_read_semantics() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 1));
        store.apply_read_update("a");
        assert!(store.get("a").unwrap().read);

        // A later unread event with the same identity resets the flag.
        store.apply_activity(follow("a", 2));
        assert!(!store.get("a").unwrap().read);
    }

    #[test]
    fn applying_the_same_event_twice_is_idempotent() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 5));
        let once: Vec<_> = store.ordered().into_iter().cloned().collect();

        store.apply_activity(follow("a", 5));
        let twice: Vec<_> = store.ordered().into_iter().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn identity_less_events_always_append() {
        let mut store = EventStore::new();
        store.apply_activity(synthetic());
        store.apply_activity(synthetic());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn read_update_on_unknown_identity_is_a_noop() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 1));
        store.apply_read_update("missing");
        assert_eq!(store.len(), 1);
        assert!(!store.get("a").unwrap().read);
    }

    #[test]
    fn read_update_preserves_other_fields() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 7));
        store.apply_read_update("a");

        let event = store.get("a").unwrap();
        assert!(event.read);
        assert_eq!(event.received_order, 7);
        assert_eq!(event.payload["username"], "viewer");
    }

    #[test]
    fn ordering_is_descending_and_stable() {
        let mut store = EventStore::new();
        store.apply_activity(follow("a", 5));
        store.apply_activity(follow("b", 1));
        store.apply_activity(follow("c", 3));

        let ids: Vec<_> =
            store.ordered().iter().map(|e| e.identity.clone().unwrap()).collect();
        assert_eq!(ids, ["a", "c", "b"]);

        // Equal orders keep arrival order.
        store.apply_activity(follow("d", 3));
        let ids: Vec<_> =
            store.ordered().iter().map(|e| e.identity.clone().unwrap()).collect();
        assert_eq!(ids, ["a", "c", "d", "b"]);
    }

    #[test]
    fn snapshot_replace_discards_accumulated_state() {
        let mut store = EventStore::new();
        store.apply_activity(follow("live-only", 100));

        store.snapshot_replace(vec![follow("x", 2), follow("y", 1)]);

        assert_eq!(store.len(), 2);
        assert!(store.get("live-only").is_none());
    }

    #[test]
    fn snapshot_replace_dedupes_by_identity_first_wins() {
        let mut store = EventStore::new();
        let mut first = follow("dup", 3);
        first.data = json!({ "username": "first" });
        let mut second = follow("dup", 4);
        second.data = json!({ "username": "second" });

        store.snapshot_replace(vec![first, second, follow("other", 1)]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("dup").unwrap().payload["username"], "first");
    }

    #[test]
    fn activity_after_snapshot_replaces_instead_of_duplicating() {
        let mut store = EventStore::new();
        store.snapshot_replace(vec![follow("a", 1), follow("b", 2)]);

        store.apply_activity(follow("a", 10));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().received_order, 10);
    }
}
