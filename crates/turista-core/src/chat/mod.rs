//! Conversation timeline and directory: API trait, session, directory.

pub mod api;
pub mod directory;
pub mod session;
pub mod timeline;

pub use api::ChatApi;
pub use directory::ConversationDirectory;
pub use session::{ChatSession, PAGE_SIZE};
pub use timeline::{OutboundMessage, OutboundState, TimelineEntry};
