//! In-memory backend.
//! Serves demo data when no Supabase project is configured, and behaves
//! like the stored procedures for search, ordering and the `before` bound.

use std::cell::RefCell;
use std::cmp::Ordering;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use flabee_core::ports::BackendPort;
use flabee_types::{
    DashboardError, Result,
    analytics::{AnalyticsData, ChannelMessageCount, ConversationActivity, DailyActiveConversations, DailyMessageCount},
    conversation::{Conversation, ConversationStatus},
    id::RecordId,
    message::{Message, Role},
    timestamp::Timestamp,
};

#[derive(Default)]
pub struct MemoryBackend {
    conversations: RefCell<Vec<Conversation>>,
    messages: RefCell<Vec<Message>>,
    analytics: RefCell<AnalyticsData>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a conversation and its messages. `msg_count` and
    /// `last_message_at` are derived from the messages.
    pub fn with_conversation(self, mut conversation: Conversation, messages: Vec<Message>) -> Self {
        conversation.msg_count = messages.len() as u64;
        conversation.last_message_at = messages
            .iter()
            .map(|m| &m.created_at)
            .max_by(|a, b| a.cmp_instant(b))
            .cloned();
        self.conversations.borrow_mut().push(conversation);
        self.messages.borrow_mut().extend(messages);
        self
    }

    /// Precomputed analytics rows, served as the views would serve them.
    pub fn with_analytics(self, data: AnalyticsData) -> Self {
        *self.analytics.borrow_mut() = data;
        self
    }

    /// A few conversations across channels, with analytics for the last 30 days.
    pub fn demo(now: DateTime<Utc>) -> Self {
        let mut next_id: i64 = 1;
        let mut thread = |conversation: &str, count: usize, minutes_ago: i64, script: &[&str]| {
            let start = now - Duration::minutes(minutes_ago);
            (0..count)
                .map(|i| {
                    let id = next_id;
                    next_id += 1;
                    let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                    let content = script[i % script.len()].to_string();
                    let created_at = Timestamp::from_datetime(start + Duration::minutes(i as i64));
                    Message::new(id, conversation, role, content, created_at)
                })
                .collect::<Vec<_>>()
        };

        let order = thread(
            "c-1001",
            6,
            90,
            &[
                "Hi! Where is my order #4471?",
                "It left the warehouse yesterday and should arrive tomorrow.",
                "Great, can I change the delivery address?",
                "Yes, send me the new address and I'll update it.",
            ],
        );
        let mut refund = thread(
            "c-1002",
            4,
            60 * 26,
            &[
                "I want a refund for the blue jacket.",
                "Sorry to hear that. I've opened a return for you.",
            ],
        );
        if let Some(first) = refund.first_mut() {
            first.meta = Some(serde_json::json!({ "source": "whatsapp", "locale": "pt-BR" }));
        }
        let long_chat = thread(
            "c-1003",
            120,
            60 * 72,
            &[
                "Quick question about sizes",
                "Of course, which product?",
                "The running shoes",
                "They run half a size small.",
            ],
        );

        let mut order_conv = Conversation::new("c-1001");
        order_conv.user_label = Some("Ana Souza".to_string());
        order_conv.tags = vec!["orders".to_string()];
        order_conv.last_channel = Some("web".to_string());

        let mut refund_conv = Conversation::new("c-1002");
        refund_conv.user_label = Some("Bruno Lima".to_string());
        refund_conv.title = Some("Jacket refund".to_string());
        refund_conv.status = ConversationStatus::Closed;
        refund_conv.tags = vec!["refund".to_string(), "vip".to_string()];
        refund_conv.last_channel = Some("whatsapp".to_string());

        let mut long_conv = Conversation::new("c-1003");
        long_conv.last_channel = Some("instagram".to_string());

        Self::new()
            .with_conversation(order_conv, order)
            .with_conversation(refund_conv, refund)
            .with_conversation(long_conv, long_chat)
            .with_analytics(demo_analytics(now))
    }

    fn conversation_mut<T>(&self, id: &RecordId, f: impl FnOnce(&mut Conversation) -> T) -> Result<T> {
        let mut conversations = self.conversations.borrow_mut();
        let conv = conversations
            .iter_mut()
            .find(|c| &c.conversation_id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("conversation {}", id)))?;
        Ok(f(conv))
    }

    fn last_message_text(&self, id: &RecordId) -> Option<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|m| m.conversation_id.as_ref() == Some(id))
            .min_by(|a, b| newest_first(a, b))
            .map(|m| m.text().to_string())
    }
}

/// `created_at` descending, then id descending
fn newest_first(a: &Message, b: &Message) -> Ordering {
    b.created_at
        .cmp_instant(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

fn on_or_after(day: &str, cutoff: &str) -> bool {
    day.get(..10).unwrap_or(day) >= cutoff
}

fn demo_analytics(now: DateTime<Utc>) -> AnalyticsData {
    let mut data = AnalyticsData::default();
    for back in (0..30_u64).rev() {
        let day = (now - Duration::days(back as i64)).format("%Y-%m-%d").to_string();
        let total = 40 + (back * 17) % 35;
        let user_msgs = total / 2 + back % 3;
        data.daily.push(DailyMessageCount {
            day: day.clone(),
            total,
            user_msgs,
            assistant_msgs: total - user_msgs,
        });
        let web = total / 2;
        let whatsapp = total / 3;
        for (channel, cnt) in [("web", web), ("whatsapp", whatsapp), ("instagram", total - web - whatsapp)] {
            data.channels.push(ChannelMessageCount {
                day: day.clone(),
                channel: channel.to_string(),
                cnt,
            });
        }
        data.active.push(DailyActiveConversations {
            day,
            active_conversations: 6 + back % 5,
        });
    }
    data
}

#[async_trait(?Send)]
impl BackendPort for MemoryBackend {
    async fn list_conversations(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Conversation>> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let mut rows: Vec<Conversation> = self
            .conversations
            .borrow()
            .iter()
            .filter(|c| match &needle {
                None => true,
                Some(n) => {
                    c.user_label.as_deref().unwrap_or_default().to_lowercase().contains(n)
                        || self
                            .last_message_text(&c.conversation_id)
                            .is_some_and(|t| t.to_lowercase().contains(n))
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| match (&a.last_message_at, &b.last_message_at) {
            (Some(x), Some(y)) => y.cmp_instant(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn list_messages(
        &self,
        conversation_id: &RecordId,
        before: Option<&Timestamp>,
        limit: u32,
    ) -> Result<Vec<Message>> {
        let mut rows: Vec<Message> = self
            .messages
            .borrow()
            .iter()
            .filter(|m| m.conversation_id.as_ref() == Some(conversation_id))
            .filter(|m| before.map_or(true, |b| m.created_at.cmp_instant(b) == Ordering::Less))
            .cloned()
            .collect();
        rows.sort_by(newest_first);
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn rename_conversation(&self, conversation_id: &RecordId, title: &str) -> Result<()> {
        self.conversation_mut(conversation_id, |c| c.title = Some(title.to_string()))
    }

    async fn set_conversation_status(
        &self,
        conversation_id: &RecordId,
        status: ConversationStatus,
    ) -> Result<()> {
        self.conversation_mut(conversation_id, |c| c.status = status)
    }

    async fn set_conversation_tags(&self, conversation_id: &RecordId, tags: &[String]) -> Result<()> {
        self.conversation_mut(conversation_id, |c| c.tags = tags.to_vec())
    }

    async fn update_message(&self, message_id: &RecordId, content: &str) -> Result<()> {
        let mut messages = self.messages.borrow_mut();
        let message = messages
            .iter_mut()
            .find(|m| &m.id == message_id)
            .ok_or_else(|| DashboardError::NotFound(format!("message {}", message_id)))?;
        message.set_content(content);
        Ok(())
    }

    async fn daily_message_counts(&self, cutoff: &str) -> Result<Vec<DailyMessageCount>> {
        Ok(self
            .analytics
            .borrow()
            .daily
            .iter()
            .filter(|r| on_or_after(&r.day, cutoff))
            .cloned()
            .collect())
    }

    async fn channel_message_counts(&self, cutoff: &str) -> Result<Vec<ChannelMessageCount>> {
        Ok(self
            .analytics
            .borrow()
            .channels
            .iter()
            .filter(|r| on_or_after(&r.day, cutoff))
            .cloned()
            .collect())
    }

    async fn daily_active_conversations(&self, cutoff: &str) -> Result<Vec<DailyActiveConversations>> {
        Ok(self
            .analytics
            .borrow()
            .active
            .iter()
            .filter(|r| on_or_after(&r.day, cutoff))
            .cloned()
            .collect())
    }

    async fn conversation_activity(&self, cutoff: &str) -> Result<Vec<ConversationActivity>> {
        Ok(self
            .conversations
            .borrow()
            .iter()
            .filter(|c| {
                c.last_message_at
                    .as_ref()
                    .and_then(Timestamp::date)
                    .is_some_and(|d| on_or_after(&d.to_string(), cutoff))
            })
            .map(|c| ConversationActivity {
                status: c.status,
                last_message_at: c.last_message_at.clone(),
            })
            .collect())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
