//! Presence roster entries.
//!
//! The relay periodically broadcasts the full set of connected dashboard
//! sessions on the `active-sockets` tag. Each broadcast is a snapshot, not a
//! delta: downstream trackers replace their roster wholesale.

use serde::{Deserialize, Serialize};

/// One connected peer session from a roster broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSessionRecord {
    /// Transport-level session key.
    #[serde(rename = "socketId")]
    pub session_id: String,

    /// Account the session authenticated as.
    pub user_id: String,

    /// Display name of the account.
    #[serde(rename = "username")]
    pub display_name: String,

    /// When the session's credential was issued, in epoch seconds.
    #[serde(rename = "iat")]
    pub joined_at: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::PeerSessionRecord;

    #[test]
    fn deserializes_roster_entry() {
        let session: PeerSessionRecord = serde_json::from_value(json!({
            "socketId": "sock-1",
            "userId": "user-9",
            "username": "mod_alice",
            "iat": 1_694_000_000
        }))
        .unwrap();

        assert_eq!(session.session_id, "sock-1");
        assert_eq!(session.user_id, "user-9");
        assert_eq!(session.display_name, "mod_alice");
        assert_eq!(session.joined_at, 1_694_000_000);
    }
}
