//! Headless screens
//!
//! Each screen owns its state and talks to the catalogue through a shared
//! `QueryClient`. Rendering is left to whoever drives them.

pub mod search;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;

pub use search::{PendingSearch, SearchOutcome, SearchScreen};
pub use summary::SummaryScreen;
