//! Search handoff between screens
//!
//! A search chosen on one screen is parked here and replayed by the next
//! screen when it mounts. The store holds at most one pending
//! `SearchCriteria`; reading it clears it. A `HandoffStore` trait describes
//! the slot so screens can be handed any implementation.

pub mod adapters;
pub mod store;

pub use adapters::InMemoryHandoffStore;
pub use store::{HandoffStore, HandoffStoreRef, SearchCriteria};
