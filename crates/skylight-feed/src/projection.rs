//! View projection.
//!
//! Derives the renderable state from the store and the presence tracker.
//! Pure function, no caching: the store size is bounded by session-lifetime
//! event volume, so recomputing per render is cheap.

use skylight_proto::PeerSessionRecord;

use crate::{presence::PresenceTracker, store::ActivityEvent, store::EventStore};

/// Renderable feed state.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    /// Activity events, most recent first.
    pub events: Vec<ActivityEvent>,
    /// Peer sessions, in broadcast order.
    pub roster: Vec<PeerSessionRecord>,
}

/// Project the renderable view from the current pipeline state.
pub fn project(store: &EventStore, presence: &PresenceTracker) -> FeedView {
    FeedView {
        events: store.ordered().into_iter().cloned().collect(),
        roster: presence.roster().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::project;
    use crate::{presence::PresenceTracker, store::EventStore};

    #[test]
    fn projection_orders_events_descending() {
        let mut store = EventStore::new();
        for (id, order) in [("a", 5), ("b", 1), ("c", 3)] {
            store.apply_activity(
                serde_json::from_value(json!({
                    "_id": id,
                    "provider": "twitch",
                    "type": "follow",
                    "createdAt": order
                }))
                .unwrap(),
            );
        }

        let view = project(&store, &PresenceTracker::new());
        let orders: Vec<_> = view.events.iter().map(|e| e.received_order).collect();
        assert_eq!(orders, [5, 3, 1]);
        assert!(view.roster.is_empty());
    }
}
