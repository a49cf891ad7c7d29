//! Supabase (PostgREST) backend adapter.
//!
//! Stored procedures are called as `POST /rest/v1/rpc/<name>` with `p_*`
//! parameters; analytics views are read with plain table queries.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use flabee_core::ports::BackendPort;
use flabee_types::{
    DashboardError, Result,
    analytics::{ChannelMessageCount, ConversationActivity, DailyActiveConversations, DailyMessageCount},
    config::BackendConfig,
    conversation::{Conversation, ConversationStatus},
    id::RecordId,
    message::Message,
    timestamp::Timestamp,
};

pub struct SupabaseBackend {
    rest_base: String,
    api_key: String,
}

impl SupabaseBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            rest_base: config.rest_base(),
            api_key: config.api_key.trim().to_string(),
        }
    }

    pub fn rpc_url(&self, name: &str) -> String {
        format!("{}/rpc/{}", self.rest_base, name)
    }

    /// `GET` URL for a view filtered on `column >= cutoff`.
    pub fn table_url(&self, table: &str, select: &str, column: &str, cutoff: &str) -> String {
        let mut url = format!(
            "{}/{}?select={}&{}=gte.{}",
            self.rest_base, table, select, column, cutoff
        );
        if column == "day" {
            url.push_str("&order=day.asc");
        }
        url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }

    async fn call(&self, name: &str, params: Value) -> Result<String> {
        let response = self
            .authorize(Request::post(&self.rpc_url(name)))
            .header("Content-Type", "application/json")
            .json(&params)
            .map_err(|e| DashboardError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;
        read_body(name, response).await
    }

    async fn rpc_rows<T: DeserializeOwned>(&self, name: &str, params: Value) -> Result<Vec<T>> {
        let body = self.call(name, params).await?;
        parse_rows(&body)
    }

    async fn rpc_void(&self, name: &str, params: Value) -> Result<()> {
        self.call(name, params).await?;
        log::info!("{} confirmed", name);
        Ok(())
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        column: &str,
        cutoff: &str,
    ) -> Result<Vec<T>> {
        let url = self.table_url(table, select, column, cutoff);
        let response = self
            .authorize(Request::get(&url))
            .send()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;
        let body = read_body(table, response).await?;
        parse_rows(&body)
    }
}

async fn read_body(what: &str, response: Response) -> Result<String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))?;
    if !response.ok() {
        log::error!("{} failed with HTTP {}", what, status);
        return Err(DashboardError::Backend {
            status,
            message: backend_message(&text),
        });
    }
    Ok(text)
}

/// Rows of a JSON array body. `null` or an empty body is an empty list.
pub fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Option<Vec<T>> = serde_json::from_str(trimmed)?;
    Ok(rows.unwrap_or_default())
}

/// PostgREST puts the reason in `message`; fall back to the raw body.
pub fn backend_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

pub fn list_conversations_params(search: Option<&str>, limit: u32, offset: u32) -> Value {
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    json!({
        "p_search": search,
        "p_limit": limit,
        "p_offset": offset,
    })
}

pub fn list_messages_params(conversation_id: &RecordId, before: Option<&Timestamp>, limit: u32) -> Value {
    json!({
        "p_conversation_id": conversation_id,
        "p_before": before,
        "p_limit": limit,
    })
}

#[async_trait(?Send)]
impl BackendPort for SupabaseBackend {
    async fn list_conversations(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Conversation>> {
        self.rpc_rows("list_conversations", list_conversations_params(search, limit, offset))
            .await
    }

    async fn list_messages(
        &self,
        conversation_id: &RecordId,
        before: Option<&Timestamp>,
        limit: u32,
    ) -> Result<Vec<Message>> {
        self.rpc_rows("list_messages", list_messages_params(conversation_id, before, limit))
            .await
    }

    async fn rename_conversation(&self, conversation_id: &RecordId, title: &str) -> Result<()> {
        self.rpc_void(
            "rename_conversation",
            json!({ "p_conversation_id": conversation_id, "p_title": title }),
        )
        .await
    }

    async fn set_conversation_status(
        &self,
        conversation_id: &RecordId,
        status: ConversationStatus,
    ) -> Result<()> {
        self.rpc_void(
            "set_conversation_status",
            json!({ "p_conversation_id": conversation_id, "p_status": status.as_str() }),
        )
        .await
    }

    async fn set_conversation_tags(&self, conversation_id: &RecordId, tags: &[String]) -> Result<()> {
        self.rpc_void(
            "set_conversation_tags",
            json!({ "p_conversation_id": conversation_id, "p_tags": tags }),
        )
        .await
    }

    async fn update_message(&self, message_id: &RecordId, content: &str) -> Result<()> {
        self.rpc_void(
            "update_message",
            json!({ "p_message_id": message_id, "p_content": content }),
        )
        .await
    }

    async fn daily_message_counts(&self, cutoff: &str) -> Result<Vec<DailyMessageCount>> {
        self.select("daily_message_counts", "*", "day", cutoff).await
    }

    async fn channel_message_counts(&self, cutoff: &str) -> Result<Vec<ChannelMessageCount>> {
        self.select("channel_message_counts", "*", "day", cutoff).await
    }

    async fn daily_active_conversations(&self, cutoff: &str) -> Result<Vec<DailyActiveConversations>> {
        self.select("daily_active_conversations", "*", "day", cutoff).await
    }

    async fn conversation_activity(&self, cutoff: &str) -> Result<Vec<ConversationActivity>> {
        self.select("conversations", "status,last_message_at", "last_message_at", cutoff)
            .await
    }

    fn backend_name(&self) -> &str {
        "supabase"
    }
}
