use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::de::present;
use crate::id::RecordId;
use crate::nullable::Nullable;
use crate::timestamp::Timestamp;

/// Author of a message. Roles other than `user` and `assistant` (`system`,
/// `tool`, ...) are kept as the backend spelled them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One row of the `list_messages` procedure.
///
/// Columns this type does not model are kept in `extra` so a message can be
/// exported exactly as the backend returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub conversation_id: Nullable<RecordId>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub content: Nullable<String>,
    pub created_at: Timestamp,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(
        id: impl Into<RecordId>,
        conversation_id: impl Into<RecordId>,
        role: Role,
        content: impl Into<String>,
        created_at: impl Into<Timestamp>,
    ) -> Self {
        Self {
            id: id.into(),
            conversation_id: Nullable::Value(conversation_id.into()),
            role,
            content: Nullable::Value(content.into()),
            created_at: created_at.into(),
            meta: None,
            extra: Map::new(),
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// True when `meta` carries something worth showing
    pub fn has_meta(&self) -> bool {
        match &self.meta {
            None | Some(Value::Null) => false,
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Message text; a `null` or missing content column reads as empty.
    pub fn text(&self) -> &str {
        self.content.as_ref().map_or("", String::as_str)
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = Nullable::Value(content.to_string());
    }

    /// First `max_chars` characters of the content on a single line
    pub fn preview(&self, max_chars: usize) -> String {
        self.text()
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect()
    }
}
