//! Per-conversation message cache.
//!
//! Each conversation moves through `Unloaded -> Loading -> Loaded`. A loaded
//! window stays as it is until it is reloaded, invalidated, or an edit is
//! confirmed. A failed fetch leaves the previous window untouched.

use std::collections::{HashMap, HashSet};
use flabee_types::{
    Result,
    config::PagingConfig,
    id::RecordId,
    message::Message,
};
use crate::cursor::{fetch_backward, splice_older, PageCursor};
use crate::ports::BackendPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// How much history a surface wants on first access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Only the newest page, older pages on request (chat viewer)
    Latest,
    /// The whole conversation (admin editor)
    Full,
}

/// Cached messages of one conversation, oldest first.
#[derive(Debug, Clone)]
pub struct MessageWindow {
    messages: Vec<Message>,
    cursor: PageCursor,
    /// Set once a full load ran, even if it stopped at the page cap
    backfilled: bool,
}

impl MessageWindow {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True when nothing older remains on the backend
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    fn ids(&self) -> HashSet<RecordId> {
        self.messages.iter().map(|m| m.id.clone()).collect()
    }
}

#[derive(Debug)]
struct Slot {
    state: LoadState,
    window: Option<MessageWindow>,
}

pub struct MessageWindowCache {
    page_size: u32,
    viewer_page_size: u32,
    max_pages: usize,
    slots: HashMap<RecordId, Slot>,
}

impl MessageWindowCache {
    pub fn new(paging: &PagingConfig) -> Self {
        Self {
            page_size: paging.message_page_size.max(1),
            viewer_page_size: paging.viewer_page_size.max(1),
            max_pages: paging.max_pages.max(1),
            slots: HashMap::new(),
        }
    }

    pub fn state(&self, conversation_id: &RecordId) -> LoadState {
        self.slots
            .get(conversation_id)
            .map(|s| s.state)
            .unwrap_or(LoadState::Unloaded)
    }

    pub fn window(&self, conversation_id: &RecordId) -> Option<&MessageWindow> {
        self.slots.get(conversation_id)?.window.as_ref()
    }

    /// Cached messages without fetching
    pub fn cached(&self, conversation_id: &RecordId) -> Option<&[Message]> {
        self.window(conversation_id).map(MessageWindow::messages)
    }

    /// The whole conversation, oldest first. Fetches only on first access
    /// (or to complete a window opened with [`WindowMode::Latest`]).
    pub async fn get_or_load(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: &RecordId,
    ) -> Result<&[Message]> {
        let complete = matches!(self.window(conversation_id), Some(w) if w.backfilled || w.is_exhausted());
        if self.state(conversation_id) != LoadState::Loaded || !complete {
            let base = self.window(conversation_id).cloned();
            self.load_backward(backend, conversation_id, base, self.page_size, self.max_pages, true)
                .await?;
        }
        Ok(self.cached(conversation_id).unwrap_or_default())
    }

    /// Fetch the whole conversation again, replacing the cached window on success.
    pub async fn reload(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: &RecordId,
    ) -> Result<&[Message]> {
        self.load_backward(backend, conversation_id, None, self.page_size, self.max_pages, true)
            .await?;
        Ok(self.cached(conversation_id).unwrap_or_default())
    }

    /// Open a window on the newest page only. An already loaded window is returned as is.
    pub async fn open_latest(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: &RecordId,
    ) -> Result<&[Message]> {
        if self.state(conversation_id) != LoadState::Loaded {
            self.load_backward(backend, conversation_id, None, self.viewer_page_size, 1, false)
                .await?;
        }
        Ok(self.cached(conversation_id).unwrap_or_default())
    }

    /// Fetch the next older page and splice it onto the front of the window.
    /// Does nothing once the start of the conversation has been reached.
    pub async fn load_earlier(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: &RecordId,
    ) -> Result<&[Message]> {
        let Some(window) = self.window(conversation_id) else {
            return self.open_latest(backend, conversation_id).await;
        };
        if !window.is_exhausted() {
            let base = Some(window.clone());
            self.load_backward(backend, conversation_id, base, self.viewer_page_size, 1, false)
                .await?;
        }
        Ok(self.cached(conversation_id).unwrap_or_default())
    }

    /// Drop a conversation's window; the next access fetches again.
    pub fn invalidate(&mut self, conversation_id: &RecordId) {
        if self.slots.remove(conversation_id).is_some() {
            log::debug!("Invalidated message window for {}", conversation_id);
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Replace a message's content in every cached window, keeping its position.
    /// Call only after the backend confirmed the edit.
    pub fn apply_edit(&mut self, message_id: &RecordId, content: &str) -> Option<Message> {
        let mut updated = None;
        for window in self.slots.values_mut().filter_map(|s| s.window.as_mut()) {
            if let Some(msg) = window.messages.iter_mut().find(|m| &m.id == message_id) {
                msg.set_content(content);
                updated = Some(msg.clone());
            }
        }
        updated
    }

    /// Walk backward from `base` (or from the newest message) and commit the
    /// result only if every request succeeded.
    async fn load_backward(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: &RecordId,
        base: Option<MessageWindow>,
        page_size: u32,
        max_pages: usize,
        full: bool,
    ) -> Result<()> {
        let previous = self.state(conversation_id);
        self.slots
            .entry(conversation_id.clone())
            .or_insert(Slot { state: LoadState::Unloaded, window: None })
            .state = LoadState::Loading;

        let (cursor, known) = match &base {
            Some(w) => (w.cursor.clone().with_page_size(page_size), w.ids()),
            None => (PageCursor::new(page_size), HashSet::new()),
        };

        let fetched = fetch_backward(backend, conversation_id, cursor, max_pages, &known).await;
        let backfill = match fetched {
            Ok(b) => b,
            Err(e) => {
                log::error!("Loading messages for {} failed: {}", conversation_id, e);
                self.restore(conversation_id, previous);
                return Err(e);
            }
        };

        if full && !backfill.is_exhausted() {
            log::warn!(
                "Stopped loading {} after {} pages; older messages remain",
                conversation_id,
                backfill.pages
            );
        }

        let window = match base {
            Some(mut w) => {
                splice_older(&mut w.messages, backfill.messages);
                w.cursor = backfill.cursor;
                w.backfilled |= full;
                w
            }
            None => MessageWindow {
                messages: backfill.messages,
                cursor: backfill.cursor,
                backfilled: full,
            },
        };
        log::info!("Message window for {}: {} messages", conversation_id, window.messages.len());

        self.slots.insert(
            conversation_id.clone(),
            Slot {
                state: LoadState::Loaded,
                window: Some(window),
            },
        );
        Ok(())
    }

    fn restore(&mut self, conversation_id: &RecordId, previous: LoadState) {
        if previous == LoadState::Unloaded && self.window(conversation_id).is_none() {
            self.slots.remove(conversation_id);
        } else if let Some(slot) = self.slots.get_mut(conversation_id) {
            slot.state = previous;
        }
    }
}
