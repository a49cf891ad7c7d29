use serde::{Deserialize, Serialize};
use crate::de::null_default;
use crate::id::RecordId;
use crate::timestamp::Timestamp;

/// Lifecycle status of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Open,
    Closed,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Open => "open",
            ConversationStatus::Closed => "closed",
        }
    }

    pub fn all() -> &'static [ConversationStatus] {
        &[ConversationStatus::Open, ConversationStatus::Closed]
    }
}

/// One row of the `list_conversations` procedure.
///
/// This is a read-mostly snapshot; mutations go through the backend and the
/// snapshot is patched only after the call succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user_label: Option<String>,
    /// `null` in the view means the conversation was never closed
    #[serde(default, deserialize_with = "null_default")]
    pub status: ConversationStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_default")]
    pub msg_count: u64,
    #[serde(default)]
    pub last_channel: Option<String>,
}

impl Conversation {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            conversation_id: id.into(),
            title: None,
            user_label: None,
            status: ConversationStatus::Open,
            tags: Vec::new(),
            last_message_at: None,
            msg_count: 0,
            last_channel: None,
        }
    }

    /// Label used in conversation lists
    pub fn list_name(&self) -> &str {
        non_empty(&self.user_label).unwrap_or("Chat")
    }

    /// Label used in page headings
    pub fn heading(&self) -> &str {
        non_empty(&self.user_label).unwrap_or("Conversation")
    }

    pub fn channel(&self) -> &str {
        non_empty(&self.last_channel).unwrap_or("unknown")
    }

    pub fn last_message_short(&self) -> String {
        self.last_message_at
            .as_ref()
            .map(|ts| ts.short())
            .unwrap_or_default()
    }

    pub fn apply(&mut self, update: &ConversationUpdate) {
        match update {
            ConversationUpdate::Rename(title) => self.title = Some(title.clone()),
            ConversationUpdate::SetStatus(status) => self.status = *status,
            ConversationUpdate::SetTags(tags) => self.tags = tags.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Admin-side mutation of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationUpdate {
    Rename(String),
    SetStatus(ConversationStatus),
    SetTags(Vec<String>),
}

impl ConversationUpdate {
    pub fn describe(&self) -> &'static str {
        match self {
            ConversationUpdate::Rename(_) => "Title updated.",
            ConversationUpdate::SetStatus(_) => "Status updated.",
            ConversationUpdate::SetTags(_) => "Tags updated.",
        }
    }
}

/// Split comma-separated tag input, trimming whitespace and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}
