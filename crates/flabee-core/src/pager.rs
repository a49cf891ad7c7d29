//! Offset paging over `list_conversations`, plus the viewer's
//! client-side filter over the loaded page.

use std::collections::BTreeSet;
use chrono::NaiveDate;
use flabee_types::{
    Result,
    conversation::{Conversation, ConversationUpdate},
    id::RecordId,
};
use crate::ports::BackendPort;

/// Pages through conversations matching a search term.
///
/// Pages are numbered from 1. There is no client-side upper bound: a page
/// past the end comes back empty, which means "no more results".
#[derive(Debug, Clone)]
pub struct ConversationListPager {
    search: Option<String>,
    page: u32,
    page_size: u32,
    items: Vec<Conversation>,
    loaded: bool,
}

impl ConversationListPager {
    pub fn new(page_size: u32) -> Self {
        Self {
            search: None,
            page: 1,
            page_size: page_size.max(1),
            items: Vec::new(),
            loaded: false,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Change the search term. A different term starts again from page 1.
    /// Returns whether the term changed.
    pub fn set_search(&mut self, input: &str) -> bool {
        let trimmed = input.trim();
        let next = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
        if next == self.search {
            return false;
        }
        self.search = next;
        self.page = 1;
        true
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Fetch the current page. On failure the previous items are kept.
    pub async fn load(&mut self, backend: &dyn BackendPort) -> Result<&[Conversation]> {
        let rows = backend
            .list_conversations(self.search.as_deref(), self.page_size, self.offset())
            .await?;
        log::info!(
            "Loaded conversation page {} ({} rows, search={:?})",
            self.page,
            rows.len(),
            self.search
        );
        self.items = rows;
        self.loaded = true;
        Ok(&self.items)
    }

    pub fn items(&self) -> &[Conversation] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// An empty page after page 1: the caller paged past the last result.
    pub fn is_past_end(&self) -> bool {
        self.loaded && self.items.is_empty() && self.page > 1
    }

    pub fn find(&self, id: &RecordId) -> Option<&Conversation> {
        self.items.iter().find(|c| &c.conversation_id == id)
    }

    /// Patch the snapshot after the backend confirmed a mutation.
    pub fn apply_update(&mut self, id: &RecordId, update: &ConversationUpdate) -> Option<Conversation> {
        let conv = self.items.iter_mut().find(|c| &c.conversation_id == id)?;
        conv.apply(update);
        Some(conv.clone())
    }
}

pub const ALL_CHANNELS: &str = "(all)";

/// Channel and date filter the chat viewer applies to the loaded page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFilter {
    /// `None` keeps every channel
    pub channel: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl PageFilter {
    pub fn matches(&self, conv: &Conversation) -> bool {
        self.channel_matches(conv) && self.date_matches(conv)
    }

    fn channel_matches(&self, conv: &Conversation) -> bool {
        match &self.channel {
            None => true,
            Some(channel) => channel == ALL_CHANNELS || conv.channel() == channel,
        }
    }

    /// Missing or unparseable timestamps pass.
    fn date_matches(&self, conv: &Conversation) -> bool {
        let Some(day) = conv.last_message_at.as_ref().and_then(|ts| ts.date()) else {
            return true;
        };
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    pub fn apply<'a>(&self, items: &'a [Conversation]) -> Vec<&'a Conversation> {
        items.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Distinct channels on a page, sorted, for the channel selector.
pub fn channel_options(items: &[Conversation]) -> Vec<String> {
    items
        .iter()
        .map(|c| c.channel().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
