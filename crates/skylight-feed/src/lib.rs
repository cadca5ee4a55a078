//! Activity feed for Skylight
//!
//! Pure state machines and a generic runtime for the live activity feed:
//! a relay delivers a stream of heterogeneous events (follows,
//! subscriptions, presence rosters, synthetic test events, historical
//! backfills) and this crate merges them into a single deduplicated,
//! ordered, filtered view with no server-side coordination.
//!
//! # Components
//!
//! - [`classify`]: tags an inbound frame and applies the display filter
//! - [`EventStore`]: ordered event collection with identity-replace,
//!   read-receipt, and authoritative backfill semantics
//! - [`PresenceTracker`]: roster of peer sessions, replaced wholesale
//! - [`project`]: derives the renderable [`FeedView`]; pure, no state
//! - [`FeedSession`]: owned session object tying the pipeline to the
//!   connection lifecycle
//! - [`Driver`] / [`Runtime`]: platform I/O abstraction and the
//!   orchestration loop
//!
//! Everything executes on one logical thread of control: frames are
//! processed one at a time in delivery order, so the store needs no locking
//! and only the final view ordering is computed separately.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod classify;
mod driver;
mod presence;
mod projection;
mod runtime;
mod session;
mod store;

pub use action::SessionAction;
pub use classify::{Classification, DiscardReason, FilterOrigin, classify, is_displayable};
pub use driver::{Driver, UserIntent};
pub use presence::PresenceTracker;
pub use projection::{FeedView, project};
pub use runtime::Runtime;
pub use session::FeedSession;
pub use store::{ActivityEvent, EventStore};
