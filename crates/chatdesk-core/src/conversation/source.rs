//! Conversation source trait.
//!
//! Defines the two read operations the engine needs from the backend
//! conversation store.

use super::raw::{ConversationList, RawConversation};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract read-only view of the backend conversation store.
///
/// This trait decouples the engine from the transport (HTTP, fixtures in
/// tests, ...). Both calls may suspend; neither is retried by the engine.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Lists every conversation visible to the user.
    ///
    /// # Returns
    ///
    /// - `Ok(ConversationList)`: All conversations, in backend order
    /// - `Err(_)`: Transport or decoding failure
    async fn list_conversations(&self) -> Result<ConversationList>;

    /// Fetches a single conversation by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RawConversation))`: Conversation found
    /// - `Ok(None)`: The backend reports that no such conversation exists
    /// - `Err(_)`: Transport or decoding failure
    async fn get_conversation(&self, id: &str) -> Result<Option<RawConversation>>;
}
