//! UI-level state that drives rendering.
//! This is a read-only projection of the session, updated each frame by
//! draining the EventBus, plus the text the user is typing.

use std::cell::Cell;

use chrono::NaiveDate;
use flabee_core::cache::WindowMode;
use flabee_core::pager::{PageFilter, ALL_CHANNELS};
use flabee_types::{
    analytics::{AnalyticsData, AnalyticsRange, AnalyticsSummary},
    conversation::{format_tags, parse_tags, Conversation, ConversationStatus, ConversationUpdate},
    event::DashboardEvent,
    id::RecordId,
    message::Message,
};

/// The three dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    #[default]
    Viewer,
    Admin,
    Analytics,
}

impl Surface {
    pub fn all() -> &'static [Surface] {
        &[Surface::Viewer, Surface::Admin, Surface::Analytics]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Surface::Viewer => "Chat viewer",
            Surface::Admin => "Admin",
            Surface::Analytics => "Analytics",
        }
    }

    /// How much history the surface loads when a conversation is opened
    pub fn window_mode(&self) -> WindowMode {
        match self {
            Surface::Admin => WindowMode::Full,
            Surface::Viewer | Surface::Analytics => WindowMode::Latest,
        }
    }
}

/// What the caller should do after a panel was rendered
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SwitchSurface(Surface),
    Search(String),
    NextPage,
    PrevPage,
    Refresh,
    SelectConversation(RecordId),
    LoadEarlier,
    ReloadMessages,
    UpdateConversation(ConversationUpdate),
    EditMessage { message_id: RecordId, content: String },
    Export,
    LoadAnalytics(AnalyticsRange),
}

impl UiAction {
    /// Short name for the status line
    pub fn describe(&self) -> String {
        match self {
            UiAction::SwitchSurface(surface) => format!("switch to {}", surface.label()),
            UiAction::Search(term) if term.trim().is_empty() => "clear search".to_string(),
            UiAction::Search(term) => format!("search \"{}\"", term.trim()),
            UiAction::NextPage => "next page".to_string(),
            UiAction::PrevPage => "previous page".to_string(),
            UiAction::Refresh => "refresh".to_string(),
            UiAction::SelectConversation(id) => format!("open conversation {}", id),
            UiAction::LoadEarlier => "load earlier".to_string(),
            UiAction::ReloadMessages => "reload messages".to_string(),
            UiAction::UpdateConversation(_) => "conversation update".to_string(),
            UiAction::EditMessage { message_id, .. } => format!("edit of message {}", message_id),
            UiAction::Export => "export".to_string(),
            UiAction::LoadAnalytics(range) => format!("analytics ({})", range.label()),
        }
    }
}

/// Last analytics result
#[derive(Debug, Clone)]
pub struct AnalyticsView {
    pub range: AnalyticsRange,
    pub data: AnalyticsData,
    pub summary: AnalyticsSummary,
}

/// State visible to UI panels
pub struct UiState {
    pub surface: Surface,

    // Conversation list
    pub conversations: Vec<Conversation>,
    pub page: u32,
    pub search_input: String,
    pub active_search: Option<String>,
    pub selected_conversation: Option<usize>,

    // Viewer filter inputs
    pub channel_choice: String,
    pub from_input: String,
    pub to_input: String,

    // Message window of the selected conversation
    pub messages: Vec<Message>,
    pub messages_for: Option<RecordId>,
    pub exhausted: bool,
    pub selected_message: Option<usize>,

    // Admin edit buffers
    pub title_input: String,
    pub tags_input: String,
    pub status_choice: ConversationStatus,
    pub message_input: String,

    pub analytics_range: AnalyticsRange,
    pub analytics: Option<AnalyticsView>,

    /// JSONL export waiting to be handed to the browser
    pub pending_export: Option<(String, String)>,

    pub busy: bool,
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            surface: Surface::Viewer,
            conversations: Vec::new(),
            page: 1,
            search_input: String::new(),
            active_search: None,
            selected_conversation: None,
            channel_choice: ALL_CHANNELS.to_string(),
            from_input: String::new(),
            to_input: String::new(),
            messages: Vec::new(),
            messages_for: None,
            exhausted: true,
            selected_message: None,
            title_input: String::new(),
            tags_input: String::new(),
            status_choice: ConversationStatus::Open,
            message_input: String::new(),
            analytics_range: AnalyticsRange::default(),
            analytics: None,
            pending_export: None,
            busy: false,
            show_settings: false,
            status_text: "Ready".to_string(),
            notice: None,
            error: None,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<DashboardEvent>) {
        for event in events {
            match event {
                DashboardEvent::ActionStart { label } => {
                    self.busy = true;
                    self.status_text = format!("{}...", label);
                    self.notice = None;
                    self.error = None;
                }
                DashboardEvent::ConversationsLoaded {
                    page,
                    search,
                    conversations,
                } => {
                    let selected_id = self.selected_conversation().map(|c| c.conversation_id.clone());
                    self.conversations = conversations;
                    self.page = page;
                    self.active_search = search;
                    self.selected_conversation = match selected_id {
                        Some(id) => self
                            .conversations
                            .iter()
                            .position(|c| c.conversation_id == id)
                            .or(self.selected_conversation),
                        None => self.selected_conversation,
                    };
                    self.clamp_selection();
                }
                DashboardEvent::MessagesLoaded {
                    conversation_id,
                    messages,
                    exhausted,
                } => {
                    if self.messages_for.as_ref() != Some(&conversation_id) {
                        self.selected_message = None;
                        self.message_input.clear();
                    }
                    self.messages = messages;
                    self.messages_for = Some(conversation_id);
                    self.exhausted = exhausted;
                    self.clamp_selection();
                }
                DashboardEvent::ConversationUpdated { conversation } => {
                    if let Some(slot) = self
                        .conversations
                        .iter_mut()
                        .find(|c| c.conversation_id == conversation.conversation_id)
                    {
                        *slot = conversation.clone();
                    }
                    let is_selected = self
                        .selected_conversation()
                        .is_some_and(|c| c.conversation_id == conversation.conversation_id);
                    if is_selected {
                        self.fill_admin_inputs(&conversation);
                    }
                }
                DashboardEvent::MessageUpdated { message } => {
                    if let Some(slot) = self.messages.iter_mut().find(|m| m.id == message.id) {
                        *slot = message;
                    }
                }
                DashboardEvent::ExportReady { file_name, body } => {
                    self.notice = Some(format!("Exported {}", file_name));
                    self.pending_export = Some((file_name, body));
                }
                DashboardEvent::AnalyticsLoaded { range, data, summary } => {
                    self.analytics_range = range;
                    self.analytics = Some(AnalyticsView { range, data, summary });
                }
                DashboardEvent::Notice { message } => {
                    self.notice = Some(message);
                }
                DashboardEvent::ActionEnd => {
                    self.busy = false;
                    if self.error.is_none() {
                        self.status_text = "Ready".to_string();
                    }
                }
                DashboardEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                    self.error = Some(message);
                }
                DashboardEvent::ActionDropped { action } => {
                    self.notice = Some(format!("Busy, ignored {}", action));
                }
            }
        }
    }

    /// Show the surface a switch action settled on. The slot is filled by
    /// the action only after it got hold of the session.
    pub fn apply_surface(&mut self, accepted: &Cell<Option<Surface>>) -> bool {
        match accepted.take() {
            Some(surface) => {
                self.surface = surface;
                true
            }
            None => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Keep selection indices inside the current lists
    pub fn clamp_selection(&mut self) {
        self.selected_conversation = clamp_index(self.selected_conversation, self.conversations.len());
        self.selected_message = clamp_index(self.selected_message, self.messages.len());
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.conversations.get(self.selected_conversation?)
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.messages.get(self.selected_message?)
    }

    /// Select a row of the conversation list; returns the id to open.
    pub fn select_conversation(&mut self, index: usize) -> Option<RecordId> {
        let conversation = self.conversations.get(index)?.clone();
        self.selected_conversation = Some(index);
        self.fill_admin_inputs(&conversation);
        Some(conversation.conversation_id)
    }

    pub fn select_message(&mut self, index: usize) {
        if let Some(message) = self.messages.get(index) {
            self.message_input = message.text().to_string();
            self.selected_message = Some(index);
        }
    }

    fn fill_admin_inputs(&mut self, conversation: &Conversation) {
        self.title_input = conversation.title.clone().unwrap_or_default();
        self.tags_input = format_tags(&conversation.tags);
        self.status_choice = conversation.status;
    }

    /// Tags typed in the admin tag field
    pub fn parsed_tags(&self) -> Vec<String> {
        parse_tags(&self.tags_input)
    }

    /// Channel and date filter built from the viewer inputs.
    /// Dates that do not parse as `YYYY-MM-DD` are ignored.
    pub fn page_filter(&self) -> PageFilter {
        let channel = if self.channel_choice == ALL_CHANNELS || self.channel_choice.is_empty() {
            None
        } else {
            Some(self.channel_choice.clone())
        };
        PageFilter {
            channel,
            from: parse_day(&self.from_input),
            to: parse_day(&self.to_input),
        }
    }

    /// Rows of the loaded page that pass the viewer filter, with their list index
    pub fn visible_conversations(&self) -> Vec<(usize, &Conversation)> {
        let filter = self.page_filter();
        self.conversations
            .iter()
            .enumerate()
            .filter(|(_, c)| filter.matches(c))
            .collect()
    }

    /// Hand the finished export to the caller exactly once
    pub fn take_export(&mut self) -> Option<(String, String)> {
        self.pending_export.take()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_index(index: Option<usize>, len: usize) -> Option<usize> {
    match index {
        _ if len == 0 => None,
        Some(i) => Some(i.min(len - 1)),
        None => None,
    }
}

pub fn parse_day(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}
