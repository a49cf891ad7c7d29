//! JSONL export of a whole conversation.
//!
//! Runs its own backward walk instead of reading the message cache, so an
//! export always reflects the backend and never a partially loaded window.

use std::collections::HashSet;
use flabee_types::{
    DashboardError, Result,
    id::RecordId,
    message::Message,
};
use crate::cursor::{fetch_backward, PageCursor};
use crate::ports::BackendPort;

/// A finished export, ready to be offered as a download
#[derive(Debug, Clone, PartialEq)]
pub struct JsonlExport {
    pub file_name: String,
    pub body: String,
    pub records: usize,
}

pub fn export_file_name(conversation_id: &RecordId) -> String {
    format!("conversation-{}.jsonl", conversation_id)
}

/// Fetch every message of a conversation and serialize it oldest first.
///
/// Reaching `max_pages` before the start of the conversation is an error:
/// an export is either complete or not produced.
pub async fn export_conversation(
    backend: &dyn BackendPort,
    conversation_id: &RecordId,
    page_size: u32,
    max_pages: usize,
) -> Result<JsonlExport> {
    let backfill = fetch_backward(
        backend,
        conversation_id,
        PageCursor::new(page_size),
        max_pages,
        &HashSet::new(),
    )
    .await?;

    if !backfill.is_exhausted() {
        return Err(DashboardError::PageLimit { pages: backfill.pages });
    }

    let body = to_jsonl(&backfill.messages)?;
    log::info!(
        "Exported {} messages of {} in {} pages",
        backfill.messages.len(),
        conversation_id,
        backfill.pages
    );
    Ok(JsonlExport {
        file_name: export_file_name(conversation_id),
        body,
        records: backfill.messages.len(),
    })
}

/// One JSON object per line, `\n` separated, no trailing newline.
pub fn to_jsonl(messages: &[Message]) -> Result<String> {
    let lines = messages
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Read back a JSONL body. Blank lines are ignored.
pub fn parse_jsonl(body: &str) -> Result<Vec<Message>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(DashboardError::from))
        .collect()
}
