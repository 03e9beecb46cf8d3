//! Conversation records as delivered by the backend, and their normalization
//! into domain sessions.
//!
//! # Module Structure
//!
//! - `raw`: wire records (`ConversationList`, `RawConversation`, `RawMessage`)
//! - `normalizer`: pure conversion into `Session`
//! - `source`: the `ConversationSource` trait the backend adapter implements

mod normalizer;
mod raw;
mod source;

pub use normalizer::{normalize_all, normalize_conversation};
pub use raw::{ConversationList, RawConversation, RawMessage};
pub use source::ConversationSource;
