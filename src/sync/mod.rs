//! Conversation synchronization engine.
//!
//! - [`ChatSession`] - the handle the UI drives: identity selection, history, sends, views
//! - [`HistoryLoader`] - full-history fetch that replaces the store wholesale
//! - [`SendCoordinator`] - the optimistic send protocol (provisional record, reconcile, rollback)
//! - [`ProvisionalIdGenerator`] - collision-free client ids
//!
//! # Ordering
//!
//! Store mutations happen under one lock and never interleave. Network completions may still
//! arrive out of issue order; with [`SendOrdering::Concurrent`](crate::config::SendOrdering)
//! the store follows completion order, with `Serialized` requests queue FIFO and the store
//! follows issue order. Completions belonging to an identity that is no longer active are
//! dropped using the context epoch.

pub mod coordinator;
pub mod ids;
pub mod loader;
pub mod session;
pub mod state;

pub use coordinator::{PendingSend, SendCoordinator, SendOutcome};
pub use ids::ProvisionalIdGenerator;
pub use loader::{HistoryLoader, LoadOutcome};
pub use session::ChatSession;
pub use state::SessionState;
