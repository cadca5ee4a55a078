//! Generic runtime for feed orchestration.
//!
//! The Runtime drives the feed event loop, coordinating between:
//! - [`FeedSession`]: connection and feed state machine
//! - [`Driver`]: platform-specific I/O

use crate::{Driver, FeedSession, SessionAction, UserIntent};

/// Generic runtime that orchestrates a [`FeedSession`] over a [`Driver`].
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    session: FeedSession,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and relay credential.
    pub fn new(driver: D, token: String) -> Self {
        Self { driver, session: FeedSession::new(token) }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for user intents from the driver
    /// 2. Receives frames from the relay
    /// 3. Feeds both into the session and dispatches the resulting actions
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.session.view())?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.close_transport();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the session should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(intent) = self.driver.poll_intent().await? {
            let actions = match intent {
                UserIntent::Connect => self.session.connect(),
                UserIntent::Disconnect => self.session.disconnect(),
                UserIntent::Reconnect => self.session.reconnect(),
                UserIntent::RefreshBackfill { date } => self.session.refresh_backfill(date),
                UserIntent::EmitTest { payload } => self.session.emit_test(payload),
                UserIntent::Quit => return Ok(true),
            };
            self.dispatch(actions).await?;
        }

        if self.driver.is_connected() {
            match self.driver.recv_frame().await {
                Some(frame) => {
                    let actions = self.session.frame_received(frame);
                    self.dispatch(actions).await?;
                },
                None => {
                    let actions = self.session.transport_down();
                    self.dispatch(actions).await?;
                },
            }
        }

        Ok(false)
    }

    /// Dispatch session actions through the driver.
    ///
    /// Transport lifecycle actions feed back into the session, so the
    /// resulting actions are processed until the queue drains.
    async fn dispatch(&mut self, initial_actions: Vec<SessionAction>) -> Result<(), D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    SessionAction::OpenTransport => match self.driver.open_transport().await {
                        Ok(()) => pending_actions.extend(self.session.transport_up()),
                        Err(e) => {
                            tracing::warn!("Failed to open transport: {e}");
                            pending_actions.extend(self.session.transport_down());
                        },
                    },
                    SessionAction::CloseTransport => self.driver.close_transport(),
                    SessionAction::Send(frame) => self.driver.send_frame(frame).await?,
                    SessionAction::Render => self.driver.render(&self.session.view())?,
                    SessionAction::AuthRejected { detail } => {
                        self.driver.notify_auth_rejected(&detail);
                    },
                }
            }
        }
        Ok(())
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    /// Get a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut FeedSession {
        &mut self.session
    }
}
