//! Analytics surface: fetch the precomputed views for a range and derive
//! the headline figures. The aggregation itself happens server-side.

use std::collections::{BTreeMap, HashMap};
use chrono::{DateTime, Duration, Utc};
use flabee_types::{
    Result,
    analytics::{AnalyticsData, AnalyticsSummary},
    conversation::ConversationStatus,
};
use crate::ports::BackendPort;

/// Fetch the four analytics sources for rows on or after `cutoff` (`YYYY-MM-DD`).
pub async fn fetch_analytics(backend: &dyn BackendPort, cutoff: &str) -> Result<AnalyticsData> {
    let daily = backend.daily_message_counts(cutoff).await?;
    let channels = backend.channel_message_counts(cutoff).await?;
    let active = backend.daily_active_conversations(cutoff).await?;
    let conversations = backend.conversation_activity(cutoff).await?;
    log::info!(
        "Analytics since {}: {} daily, {} channel, {} active rows, {} conversations",
        cutoff,
        daily.len(),
        channels.len(),
        active.len(),
        conversations.len()
    );
    Ok(AnalyticsData { daily, channels, active, conversations })
}

pub fn summarize(data: &AnalyticsData) -> AnalyticsSummary {
    let total_messages: u64 = data.daily.iter().map(|d| d.total).sum();
    let active_conversations: u64 = data.active.iter().map(|a| a.active_conversations).sum();
    let conversations_in_range = data.conversations.len() as u64;
    let closed_conversations = data
        .conversations
        .iter()
        .filter(|c| c.status == ConversationStatus::Closed)
        .count() as u64;

    let avg = total_messages as f64 / active_conversations.max(1) as f64;
    let rate = 100.0 * closed_conversations as f64 / conversations_in_range.max(1) as f64;

    AnalyticsSummary {
        total_messages,
        active_conversations,
        avg_messages_per_conversation: round_to(avg, 2),
        conversations_in_range,
        closed_conversations,
        resolution_rate: round_to(rate, 1),
        channel_totals: channel_totals(data),
    }
}

/// Message count per channel over the whole range, largest first.
fn channel_totals(data: &AnalyticsData) -> Vec<(String, u64)> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for row in &data.channels {
        *totals.entry(row.channel.as_str()).or_default() += row.cnt;
    }
    let mut sorted: Vec<(String, u64)> = totals
        .into_iter()
        .map(|(channel, cnt)| (channel.to_string(), cnt))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fetched analytics kept per cutoff for a short time.
pub struct AnalyticsCache {
    ttl: Duration,
    entries: HashMap<String, (DateTime<Utc>, AnalyticsData)>,
}

impl AnalyticsCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.max(0)),
            entries: HashMap::new(),
        }
    }

    /// Cached data for `cutoff` if younger than the TTL, otherwise a fresh fetch.
    pub async fn get_or_fetch(
        &mut self,
        backend: &dyn BackendPort,
        cutoff: &str,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsData> {
        if let Some((fetched_at, data)) = self.entries.get(cutoff) {
            if now - *fetched_at < self.ttl {
                log::debug!("Analytics for {} served from cache", cutoff);
                return Ok(data.clone());
            }
        }
        let data = fetch_analytics(backend, cutoff).await?;
        self.entries.insert(cutoff.to_string(), (now, data.clone()));
        Ok(data)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
