//! Feed session state machine.
//!
//! [`FeedSession`] is the explicitly owned session object for one dashboard
//! activity feed: it owns the event store and presence tracker, drives the
//! connection lifecycle through [`skylight_client::Connection`], and turns
//! inbound frames into store mutations. There is no hidden module-level
//! singleton; create one per feed, destroy it with its owner.
//!
//! This is a pure state machine: it consumes frames and user intents and
//! produces [`SessionAction`] instructions for the runtime to execute.
//! Frames are processed one at a time in delivery order.

use serde_json::Value;
use skylight_client::{Connection, ConnectionAction, ConnectionEvent, ConnectionState};
use skylight_proto::{InboundFrame, OutboundFrame};

use crate::{
    action::SessionAction,
    classify::{Classification, classify},
    presence::PresenceTracker,
    projection::{FeedView, project},
    store::EventStore,
};

/// One live activity-feed session.
#[derive(Debug)]
pub struct FeedSession {
    /// Relay channel lifecycle.
    connection: Connection,
    /// Reconciled activity events.
    store: EventStore,
    /// Current peer roster.
    presence: PresenceTracker,
}

impl FeedSession {
    /// Create a session with the given relay bearer credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            connection: Connection::new(token),
            store: EventStore::new(),
            presence: PresenceTracker::new(),
        }
    }

    /// Current connection lifecycle state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Project the renderable view from the current state.
    pub fn view(&self) -> FeedView {
        project(&self.store, &self.presence)
    }

    /// Initiate a connection (also the retry path after a rejection).
    pub fn connect(&mut self) -> Vec<SessionAction> {
        let actions = self.connection.connect();
        self.map_connection_actions(actions)
    }

    /// Tear the channel down.
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        let actions = self.connection.disconnect();
        let mut actions = self.map_connection_actions(actions);
        actions.push(SessionAction::Render);
        actions
    }

    /// Disconnect followed by connect.
    pub fn reconnect(&mut self) -> Vec<SessionAction> {
        let actions = self.connection.reconnect();
        self.map_connection_actions(actions)
    }

    /// Swap the bearer credential, recreating the channel if one is live.
    pub fn refresh_credential(&mut self, token: impl Into<String>) -> Vec<SessionAction> {
        let actions = self.connection.refresh_credential(token);
        self.map_connection_actions(actions)
    }

    /// Request a backfill snapshot anchored at a timestamp (ms since epoch).
    pub fn refresh_backfill(&mut self, date: i64) -> Vec<SessionAction> {
        vec![SessionAction::Send(OutboundFrame::RefreshDate { date })]
    }

    /// Emit an ad-hoc diagnostics event.
    pub fn emit_test(&mut self, payload: Value) -> Vec<SessionAction> {
        vec![SessionAction::Send(OutboundFrame::Test { payload })]
    }

    /// The transport finished opening.
    pub fn transport_up(&mut self) -> Vec<SessionAction> {
        let actions = self.connection.handle(ConnectionEvent::TransportUp);
        self.map_connection_actions(actions)
    }

    /// The transport dropped.
    pub fn transport_down(&mut self) -> Vec<SessionAction> {
        let actions = self.connection.handle(ConnectionEvent::TransportDown);
        let mut actions = self.map_connection_actions(actions);
        actions.push(SessionAction::Render);
        actions
    }

    /// Process one inbound frame in delivery order.
    pub fn frame_received(&mut self, frame: InboundFrame) -> Vec<SessionAction> {
        let actions = self.connection.handle(ConnectionEvent::Frame(frame));
        self.map_connection_actions(actions)
    }

    /// Execute connection actions, consuming delivered data frames into the
    /// pipeline and passing transport instructions through to the runtime.
    fn map_connection_actions(&mut self, actions: Vec<ConnectionAction>) -> Vec<SessionAction> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                ConnectionAction::OpenTransport => out.push(SessionAction::OpenTransport),
                ConnectionAction::CloseTransport => out.push(SessionAction::CloseTransport),
                ConnectionAction::Send(frame) => out.push(SessionAction::Send(frame)),
                ConnectionAction::AuthRejected { detail } => {
                    out.push(SessionAction::AuthRejected { detail });
                },
                ConnectionAction::Deliver(frame) => {
                    if self.apply_frame(frame) {
                        out.push(SessionAction::Render);
                    }
                },
            }
        }
        out
    }

    /// Apply one data frame to the pipeline. Returns whether the view
    /// changed.
    fn apply_frame(&mut self, frame: InboundFrame) -> bool {
        match classify(frame) {
            Classification::Test(record) | Classification::Activity(record) => {
                self.store.apply_activity(record);
                true
            },
            Classification::Backfill(records) => {
                self.store.snapshot_replace(records);
                true
            },
            Classification::ReadUpdate(identity) => {
                self.store.apply_read_update(&identity);
                true
            },
            Classification::Presence(sessions) => {
                self.presence.replace_roster(sessions);
                true
            },
            Classification::Discard(reason) => {
                tracing::debug!(?reason, "dropping frame");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use skylight_client::ConnectionState;
    use skylight_proto::{InboundFrame, OutboundFrame};

    use super::{FeedSession, SessionAction};

    fn authenticated_session() -> FeedSession {
        let mut session = FeedSession::new("tok");
        let _ = session.connect();
        let _ = session.transport_up();
        let _ = session.frame_received(InboundFrame::Authenticated);
        session
    }

    fn follow_frame(id: &str, created_at: i64) -> InboundFrame {
        InboundFrame::Event(
            serde_json::from_value(json!({
                "_id": id,
                "provider": "twitch",
                "type": "follow",
                "createdAt": created_at
            }))
            .unwrap(),
        )
    }

    #[test]
    fn connect_then_transport_up_authenticates() {
        let mut session = FeedSession::new("tok");
        assert_eq!(session.connect(), [SessionAction::OpenTransport]);

        let actions = session.transport_up();
        assert_eq!(actions, [SessionAction::Send(OutboundFrame::authenticate("tok"))]);
        assert_eq!(session.connection_state(), ConnectionState::Authenticating);

        let _ = session.frame_received(InboundFrame::Authenticated);
        assert_eq!(session.connection_state(), ConnectionState::Authenticated);
    }

    #[test]
    fn accepted_activity_renders() {
        let mut session = authenticated_session();
        let actions = session.frame_received(follow_frame("a", 5));
        assert_eq!(actions, [SessionAction::Render]);
        assert_eq!(session.view().events.len(), 1);
    }

    #[test]
    fn filtered_activity_neither_renders_nor_stores() {
        let mut session = authenticated_session();
        let frame = InboundFrame::Event(
            serde_json::from_value(json!({
                "_id": "s",
                "provider": "twitch",
                "type": "subscriber"
            }))
            .unwrap(),
        );
        assert!(session.frame_received(frame).is_empty());
        assert!(session.view().events.is_empty());
    }

    #[test]
    fn unknown_frames_are_dropped_quietly() {
        let mut session = authenticated_session();
        let actions = session.frame_received(InboundFrame::Unknown { tag: "future".into() });
        assert!(actions.is_empty());
    }

    #[test]
    fn unauthorized_is_surfaced_and_feed_survives() {
        let mut session = FeedSession::new("bad");
        let _ = session.connect();
        let _ = session.transport_up();
        let actions =
            session.frame_received(InboundFrame::Unauthorized { detail: "expired".into() });
        assert_eq!(actions, [SessionAction::AuthRejected { detail: "expired".into() }]);
        assert_eq!(session.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn transport_down_renders_disconnected_state() {
        let mut session = authenticated_session();
        let actions = session.transport_down();
        assert_eq!(actions, [SessionAction::Render]);
        assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn refresh_backfill_sends_anchor() {
        let mut session = authenticated_session();
        let actions = session.refresh_backfill(1_700_000_000_000);
        assert_eq!(
            actions,
            [SessionAction::Send(OutboundFrame::RefreshDate { date: 1_700_000_000_000 })]
        );
    }

    #[test]
    fn read_receipt_marks_event() {
        let mut session = authenticated_session();
        let _ = session.frame_received(follow_frame("a", 5));
        let _ = session.frame_received(InboundFrame::EventRead { identity: "a".into() });
        assert!(session.view().events[0].read);
    }

    #[test]
    fn presence_broadcast_replaces_roster() {
        let mut session = authenticated_session();
        let frame = InboundFrame::ActiveSockets(vec![
            serde_json::from_value(json!({
                "socketId": "s1",
                "userId": "u1",
                "username": "alice",
                "iat": 1
            }))
            .unwrap(),
        ]);
        let actions = session.frame_received(frame);
        assert_eq!(actions, [SessionAction::Render]);
        assert_eq!(session.view().roster.len(), 1);
    }
}
