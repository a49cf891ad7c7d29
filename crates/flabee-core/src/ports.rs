//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `flabee-core` (pure Rust).
//! Implementations live in `flabee-platform` (Supabase and in-memory adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use flabee_types::{
    Result,
    analytics::{ChannelMessageCount, ConversationActivity, DailyActiveConversations, DailyMessageCount},
    conversation::{Conversation, ConversationStatus},
    id::RecordId,
    message::Message,
    timestamp::Timestamp,
};

// ─── Backend Port ────────────────────────────────────────────

/// Stored procedures and views of the hosted database.
///
/// Names and parameters are fixed by the backend; filtering, search and
/// aggregation all happen server-side.
#[async_trait(?Send)]
pub trait BackendPort {
    /// One page of conversations, most recently active first.
    /// `search` matches the user label or the last message.
    async fn list_conversations(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Conversation>>;

    /// Up to `limit` messages strictly older than `before`, newest first.
    /// Rows sharing a timestamp must come back in a stable order (by id).
    async fn list_messages(
        &self,
        conversation_id: &RecordId,
        before: Option<&Timestamp>,
        limit: u32,
    ) -> Result<Vec<Message>>;

    async fn rename_conversation(&self, conversation_id: &RecordId, title: &str) -> Result<()>;

    async fn set_conversation_status(
        &self,
        conversation_id: &RecordId,
        status: ConversationStatus,
    ) -> Result<()>;

    async fn set_conversation_tags(&self, conversation_id: &RecordId, tags: &[String]) -> Result<()>;

    async fn update_message(&self, message_id: &RecordId, content: &str) -> Result<()>;

    /// `daily_message_counts` rows with `day >= cutoff`, ascending by day
    async fn daily_message_counts(&self, cutoff: &str) -> Result<Vec<DailyMessageCount>>;

    /// `channel_message_counts` rows with `day >= cutoff`, ascending by day
    async fn channel_message_counts(&self, cutoff: &str) -> Result<Vec<ChannelMessageCount>>;

    /// `daily_active_conversations` rows with `day >= cutoff`, ascending by day
    async fn daily_active_conversations(&self, cutoff: &str) -> Result<Vec<DailyActiveConversations>>;

    /// `status,last_message_at` of conversations active since `cutoff`
    async fn conversation_activity(&self, cutoff: &str) -> Result<Vec<ConversationActivity>>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Storage Port ────────────────────────────────────────────

/// Small key/value store used to persist dashboard settings.
#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
