use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use crate::conversation::ConversationStatus;
use crate::de::null_default;
use crate::timestamp::Timestamp;

/// Row of the `daily_message_counts` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMessageCount {
    pub day: String,
    #[serde(default, deserialize_with = "null_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub user_msgs: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub assistant_msgs: u64,
}

/// Row of the `channel_message_counts` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessageCount {
    pub day: String,
    #[serde(default, deserialize_with = "null_default")]
    pub channel: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cnt: u64,
}

/// Row of the `daily_active_conversations` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActiveConversations {
    pub day: String,
    #[serde(default, deserialize_with = "null_default")]
    pub active_conversations: u64,
}

/// `status,last_message_at` projection of the `conversations` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationActivity {
    #[serde(default, deserialize_with = "null_default")]
    pub status: ConversationStatus,
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
}

/// Everything the analytics surface fetches for one date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub daily: Vec<DailyMessageCount>,
    pub channels: Vec<ChannelMessageCount>,
    pub active: Vec<DailyActiveConversations>,
    pub conversations: Vec<ConversationActivity>,
}

/// Headline figures derived from [`AnalyticsData`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_messages: u64,
    pub active_conversations: u64,
    pub avg_messages_per_conversation: f64,
    pub conversations_in_range: u64,
    pub closed_conversations: u64,
    /// Percentage, one decimal
    pub resolution_rate: f64,
    /// Message count per channel, largest first
    pub channel_totals: Vec<(String, u64)>,
}

/// Look-back window offered by the analytics range selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnalyticsRange {
    Week,
    #[default]
    Month,
    Quarter,
}

impl AnalyticsRange {
    pub fn days(&self) -> i64 {
        match self {
            AnalyticsRange::Week => 7,
            AnalyticsRange::Month => 30,
            AnalyticsRange::Quarter => 90,
        }
    }

    pub fn from_days(days: i64) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.days() == days)
    }

    pub fn all() -> &'static [AnalyticsRange] {
        &[AnalyticsRange::Week, AnalyticsRange::Month, AnalyticsRange::Quarter]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsRange::Week => "7 days",
            AnalyticsRange::Month => "30 days",
            AnalyticsRange::Quarter => "90 days",
        }
    }

    /// First day included in the range, as `YYYY-MM-DD`
    pub fn cutoff(&self, today: NaiveDate) -> String {
        (today - Duration::days(self.days())).format("%Y-%m-%d").to_string()
    }
}
