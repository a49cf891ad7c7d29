//! Text shown in lists, pickers and figures.

use flabee_types::{
    conversation::Conversation,
    message::{Message, Role},
};

const PREVIEW_CHARS: usize = 60;

/// `Ana · 2024-05-01T10:00:00 · 12 msgs · web`
pub fn viewer_label(conv: &Conversation) -> String {
    format!(
        "{} · {} · {} msgs · {}",
        conv.list_name(),
        conv.last_message_short(),
        conv.msg_count,
        conv.channel()
    )
}

/// `Ana • open • 12 msgs • 2024-05-01T10:00:00`
pub fn admin_label(conv: &Conversation) -> String {
    format!(
        "{} • {} • {} msgs • {}",
        conv.list_name(),
        conv.status.as_str(),
        conv.msg_count,
        conv.last_message_short()
    )
}

/// `2024-05-01T10:00:00 • user • first 60 chars`
pub fn message_label(msg: &Message) -> String {
    format!(
        "{} • {} • {}",
        msg.created_at.short(),
        msg.role.as_str(),
        msg.preview(PREVIEW_CHARS)
    )
}

/// User messages sit on the left, everything else on the right
pub fn bubble_on_left(role: &Role) -> bool {
    *role == Role::User
}

pub fn role_label(role: &Role) -> &str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
        Role::Other(raw) => raw,
    }
}

/// Pretty-printed `meta` of a message, `None` when there is nothing to show
pub fn meta_text(msg: &Message) -> Option<String> {
    if !msg.has_meta() {
        return None;
    }
    msg.meta.as_ref().and_then(|meta| serde_json::to_string_pretty(meta).ok())
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}
