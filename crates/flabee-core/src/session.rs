//! Per-session context shared by the three dashboards.
//!
//! Holds the conversation pager, the message cache, the analytics cache and
//! the current selection. Every operation runs one round of backend calls and
//! publishes the refreshed view model on the [`EventBus`]; failures are
//! published as `Error` events and also returned to the caller.

use chrono::{DateTime, Utc};
use flabee_types::{
    DashboardError, Result,
    analytics::AnalyticsRange,
    config::{DashboardConfig, PagingConfig},
    conversation::ConversationUpdate,
    event::DashboardEvent,
    id::RecordId,
};
use crate::analytics::{summarize, AnalyticsCache};
use crate::cache::{MessageWindowCache, WindowMode};
use crate::event_bus::EventBus;
use crate::export::export_conversation;
use crate::pager::{ConversationListPager, PageFilter};
use crate::ports::BackendPort;

/// What is selected on the current surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub conversation: Option<RecordId>,
    pub message: Option<RecordId>,
}

pub struct SessionContext {
    paging: PagingConfig,
    pub pager: ConversationListPager,
    pub filter: PageFilter,
    pub cache: MessageWindowCache,
    pub analytics: AnalyticsCache,
    pub selection: Selection,
    mode: WindowMode,
    bus: EventBus,
}

impl SessionContext {
    pub fn new(config: &DashboardConfig, mode: WindowMode, bus: EventBus) -> Self {
        Self {
            paging: config.paging.clone(),
            pager: ConversationListPager::new(config.paging.conversation_page_size),
            filter: PageFilter::default(),
            cache: MessageWindowCache::new(&config.paging),
            analytics: AnalyticsCache::new(config.analytics.cache_ttl_secs),
            selection: Selection::default(),
            mode,
            bus,
        }
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    /// Switch between the viewer (latest page) and the editor (whole history).
    /// Cached windows are dropped because they were built for the other mode.
    pub fn set_mode(&mut self, mode: WindowMode) {
        if self.mode != mode {
            self.mode = mode;
            self.cache.clear();
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // ─── Conversation list ───────────────────────────────────

    pub async fn refresh_conversations(&mut self, backend: &dyn BackendPort) -> Result<()> {
        self.start("Loading conversations");
        let result = self.publish_page(backend).await;
        self.finish(result)
    }

    /// Apply a search term; a new term always starts from page 1.
    pub async fn search(&mut self, backend: &dyn BackendPort, input: &str) -> Result<()> {
        self.pager.set_search(input);
        self.refresh_conversations(backend).await
    }

    pub async fn next_page(&mut self, backend: &dyn BackendPort) -> Result<()> {
        self.pager.next_page();
        self.refresh_conversations(backend).await
    }

    pub async fn prev_page(&mut self, backend: &dyn BackendPort) -> Result<()> {
        self.pager.prev_page();
        self.refresh_conversations(backend).await
    }

    async fn publish_page(&mut self, backend: &dyn BackendPort) -> Result<()> {
        let conversations = self.pager.load(backend).await?.to_vec();
        if conversations.is_empty() {
            let message = if self.pager.is_past_end() { "No more results." } else { "No conversations found." };
            self.bus.emit(DashboardEvent::Notice {
                message: message.to_string(),
            });
        }
        self.bus.emit(DashboardEvent::ConversationsLoaded {
            page: self.pager.page(),
            search: self.pager.search().map(String::from),
            conversations,
        });
        Ok(())
    }

    // ─── Messages ────────────────────────────────────────────

    /// Select a conversation and publish its message window.
    ///
    /// In the viewer, switching threads resets the window to the newest page.
    pub async fn select_conversation(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: RecordId,
    ) -> Result<()> {
        let switched = self.selection.conversation.as_ref() != Some(&conversation_id);
        if switched {
            self.selection = Selection {
                conversation: Some(conversation_id.clone()),
                message: None,
            };
            if self.mode == WindowMode::Latest {
                self.cache.invalidate(&conversation_id);
            }
        }
        self.start("Loading messages");
        let result = self.publish_window(backend, &conversation_id, WindowOp::Open).await;
        self.finish(result)
    }

    /// Viewer "Load earlier": splice the next older page onto the window.
    pub async fn load_earlier(&mut self, backend: &dyn BackendPort) -> Result<()> {
        let id = self.selected_conversation()?;
        self.start("Loading earlier messages");
        let result = self.publish_window(backend, &id, WindowOp::Earlier).await;
        self.finish(result)
    }

    /// Drop the cached window and fetch it again.
    pub async fn reload_messages(&mut self, backend: &dyn BackendPort) -> Result<()> {
        let id = self.selected_conversation()?;
        self.start("Reloading messages");
        let result = self.publish_window(backend, &id, WindowOp::Reload).await;
        self.finish(result)
    }

    async fn publish_window(
        &mut self,
        backend: &dyn BackendPort,
        conversation_id: &RecordId,
        op: WindowOp,
    ) -> Result<()> {
        let messages = match (op, self.mode) {
            (WindowOp::Open, WindowMode::Latest) => self.cache.open_latest(backend, conversation_id).await?,
            (WindowOp::Open, WindowMode::Full) => self.cache.get_or_load(backend, conversation_id).await?,
            (WindowOp::Earlier, _) => self.cache.load_earlier(backend, conversation_id).await?,
            (WindowOp::Reload, WindowMode::Latest) => {
                self.cache.invalidate(conversation_id);
                self.cache.open_latest(backend, conversation_id).await?
            }
            (WindowOp::Reload, WindowMode::Full) => self.cache.reload(backend, conversation_id).await?,
        }
        .to_vec();
        let exhausted = self
            .cache
            .window(conversation_id)
            .map_or(true, |w| w.is_exhausted());
        if messages.is_empty() {
            self.bus.emit(DashboardEvent::Notice {
                message: "No messages in this conversation yet.".to_string(),
            });
        }
        self.bus.emit(DashboardEvent::MessagesLoaded {
            conversation_id: conversation_id.clone(),
            messages,
            exhausted,
        });
        Ok(())
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Rename, change status, or replace tags of the selected conversation.
    /// The snapshot is patched only after the backend confirms.
    pub async fn update_conversation(
        &mut self,
        backend: &dyn BackendPort,
        update: ConversationUpdate,
    ) -> Result<()> {
        let id = self.selected_conversation()?;
        self.start("Saving conversation");
        let result = self.apply_conversation_update(backend, &id, update).await;
        self.finish(result)
    }

    async fn apply_conversation_update(
        &mut self,
        backend: &dyn BackendPort,
        id: &RecordId,
        update: ConversationUpdate,
    ) -> Result<()> {
        match &update {
            ConversationUpdate::Rename(title) => backend.rename_conversation(id, title).await?,
            ConversationUpdate::SetStatus(status) => backend.set_conversation_status(id, *status).await?,
            ConversationUpdate::SetTags(tags) => backend.set_conversation_tags(id, tags).await?,
        }
        log::info!("Conversation {} updated: {:?}", id, update);

        if let Some(conversation) = self.pager.apply_update(id, &update) {
            self.bus.emit(DashboardEvent::ConversationUpdated { conversation });
        }
        self.bus.emit(DashboardEvent::Notice {
            message: update.describe().to_string(),
        });

        self.cache.invalidate(id);
        self.publish_window(backend, id, WindowOp::Open).await
    }

    /// Save new content for a message, then update the cached copy in place.
    pub async fn edit_message(
        &mut self,
        backend: &dyn BackendPort,
        message_id: RecordId,
        content: String,
    ) -> Result<()> {
        self.start("Saving message");
        let result = self.apply_message_edit(backend, &message_id, &content).await;
        self.finish(result)
    }

    async fn apply_message_edit(
        &mut self,
        backend: &dyn BackendPort,
        message_id: &RecordId,
        content: &str,
    ) -> Result<()> {
        backend.update_message(message_id, content).await?;
        log::info!("Message {} updated", message_id);
        self.selection.message = Some(message_id.clone());

        match self.cache.apply_edit(message_id, content) {
            Some(message) => self.bus.emit(DashboardEvent::MessageUpdated { message }),
            None => log::warn!("Edited message {} is not in any cached window", message_id),
        }
        if let Some(conversation_id) = self.selection.conversation.clone() {
            let messages = self.cache.cached(&conversation_id).unwrap_or_default().to_vec();
            let exhausted = self
                .cache
                .window(&conversation_id)
                .map_or(true, |w| w.is_exhausted());
            self.bus.emit(DashboardEvent::MessagesLoaded {
                conversation_id,
                messages,
                exhausted,
            });
        }
        self.bus.emit(DashboardEvent::Notice {
            message: "Message updated.".to_string(),
        });
        Ok(())
    }

    // ─── Export / analytics ──────────────────────────────────

    pub async fn export_selected(&mut self, backend: &dyn BackendPort) -> Result<()> {
        let id = self.selected_conversation()?;
        self.start("Exporting conversation");
        let result = export_conversation(
            backend,
            &id,
            self.paging.message_page_size,
            self.paging.max_pages,
        )
        .await
        .map(|export| {
            self.bus.emit(DashboardEvent::ExportReady {
                file_name: export.file_name,
                body: export.body,
            });
        });
        self.finish(result)
    }

    pub async fn load_analytics(
        &mut self,
        backend: &dyn BackendPort,
        range: AnalyticsRange,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.start("Loading analytics");
        let cutoff = range.cutoff(now.date_naive());
        let result = self
            .analytics
            .get_or_fetch(backend, &cutoff, now)
            .await
            .map(|data| {
                let summary = summarize(&data);
                self.bus.emit(DashboardEvent::AnalyticsLoaded { range, data, summary });
            });
        self.finish(result)
    }

    // ─── Helpers ─────────────────────────────────────────────

    fn selected_conversation(&self) -> Result<RecordId> {
        self.selection
            .conversation
            .clone()
            .ok_or_else(|| DashboardError::NotFound("no conversation selected".to_string()))
    }

    fn start(&self, label: &str) {
        self.bus.emit(DashboardEvent::ActionStart {
            label: label.to_string(),
        });
    }

    fn finish(&self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            log::error!("Dashboard action failed: {}", e);
            self.bus.emit(DashboardEvent::Error {
                message: e.to_string(),
            });
        }
        self.bus.emit(DashboardEvent::ActionEnd);
        result
    }
}

#[derive(Debug, Clone, Copy)]
enum WindowOp {
    Open,
    Earlier,
    Reload,
}
