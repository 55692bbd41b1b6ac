//! The tab-content state machine: content store, undo/redo history, tab
//! registry, and the session that coordinates them.

pub mod content_store;
pub mod history;
pub mod session;
pub mod tabs;

pub use content_store::{ContentStore, Document};
pub use history::History;
pub use session::{Origin, Session};
pub use tabs::TabRegistry;
