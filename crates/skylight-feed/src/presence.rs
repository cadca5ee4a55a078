//! Presence tracking.
//!
//! The relay broadcasts the full set of connected peer sessions; each
//! broadcast is a snapshot, so the tracker replaces its roster wholesale -
//! no merge logic, no partial updates.

use skylight_proto::PeerSessionRecord;

/// Current set of peer sessions connected to the same relay channel.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    roster: Vec<PeerSessionRecord>,
}

impl PresenceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster with a fresh snapshot.
    pub fn replace_roster(&mut self, sessions: Vec<PeerSessionRecord>) {
        self.roster = sessions;
    }

    /// The current roster, in broadcast order.
    pub fn roster(&self) -> &[PeerSessionRecord] {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use skylight_proto::PeerSessionRecord;

    use super::PresenceTracker;

    fn session(id: &str) -> PeerSessionRecord {
        serde_json::from_value(json!({
            "socketId": id,
            "userId": "u1",
            "username": "alice",
            "iat": 1
        }))
        .unwrap()
    }

    #[test]
    fn roster_is_replaced_wholesale() {
        let mut tracker = PresenceTracker::new();
        tracker.replace_roster(vec![session("a"), session("b")]);
        assert_eq!(tracker.roster().len(), 2);

        // The next broadcast is not merged with the previous one.
        tracker.replace_roster(vec![session("c")]);
        let ids: Vec<_> = tracker.roster().iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, ["c"]);

        tracker.replace_roster(vec![]);
        assert!(tracker.roster().is_empty());
    }
}
