use serde::{Deserialize, Serialize};
use crate::analytics::{AnalyticsData, AnalyticsRange, AnalyticsSummary};
use crate::conversation::Conversation;
use crate::id::RecordId;
use crate::message::Message;

/// Events emitted by the session after each backend round.
/// The UI drains these once per frame and refreshes its view model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DashboardEvent {
    /// A backend round started
    ActionStart { label: String },

    /// A page of the conversation list arrived
    ConversationsLoaded {
        page: u32,
        search: Option<String>,
        conversations: Vec<Conversation>,
    },

    /// The message window of a conversation changed
    MessagesLoaded {
        conversation_id: RecordId,
        messages: Vec<Message>,
        exhausted: bool,
    },

    /// A conversation mutation was confirmed by the backend
    ConversationUpdated { conversation: Conversation },

    /// A message edit was confirmed by the backend
    MessageUpdated { message: Message },

    /// A JSONL export finished
    ExportReady { file_name: String, body: String },

    /// Analytics sources were fetched for a range
    AnalyticsLoaded {
        range: AnalyticsRange,
        data: AnalyticsData,
        summary: AnalyticsSummary,
    },

    /// Informational status line text
    Notice { message: String },

    /// The backend round finished
    ActionEnd,

    /// A backend round failed
    Error { message: String },

    /// An action arrived while another round held the session and was not run
    ActionDropped { action: String },
}
