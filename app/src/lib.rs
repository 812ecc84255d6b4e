//! Meeting catalogue client: the screens, the operations they issue, and the
//! handoff that carries a search from one screen to the next.

pub mod catalogue;
pub mod context;
pub mod handoff;
pub mod screens;

pub use context::AppContext;
pub use handoff::{HandoffStore, HandoffStoreRef, InMemoryHandoffStore, SearchCriteria};
pub use screens::{SearchScreen, SummaryScreen};
