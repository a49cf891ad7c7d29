//! WASM-target tests for flabee-core.
//!
//! Runs EventBus, pager, message cache, and export tests
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use flabee_core::cache::{LoadState, MessageWindowCache};
use flabee_core::event_bus::EventBus;
use flabee_core::export::{export_conversation, parse_jsonl};
use flabee_core::pager::ConversationListPager;
use flabee_core::ports::*;
use flabee_types::analytics::*;
use flabee_types::config::PagingConfig;
use flabee_types::conversation::*;
use flabee_types::event::DashboardEvent;
use flabee_types::id::RecordId;
use flabee_types::message::*;
use flabee_types::timestamp::Timestamp;

use async_trait::async_trait;
use std::cell::Cell;
use std::cmp::Ordering;

// ─── Mock backend ────────────────────────────────────────

struct MockBackend {
    messages: Vec<Message>,
    calls: Cell<usize>,
}

impl MockBackend {
    fn thread(n: u32) -> Self {
        let messages = (1..=n)
            .map(|i| {
                let ts = format!("2024-03-01T{:02}:{:02}:00Z", i / 60, i % 60);
                Message::new(i as i64, "t1", Role::User, format!("msg {}", i), ts.as_str())
            })
            .collect();
        Self {
            messages,
            calls: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl BackendPort for MockBackend {
    async fn list_conversations(
        &self,
        _search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> flabee_types::Result<Vec<Conversation>> {
        Ok((0..3)
            .map(|i| Conversation::new(i as i64))
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn list_messages(
        &self,
        _conversation_id: &RecordId,
        before: Option<&Timestamp>,
        limit: u32,
    ) -> flabee_types::Result<Vec<Message>> {
        self.calls.set(self.calls.get() + 1);
        let mut rows: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| before.map_or(true, |b| m.created_at.cmp_instant(b) == Ordering::Less))
            .cloned()
            .collect();
        rows.reverse();
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn rename_conversation(&self, _id: &RecordId, _title: &str) -> flabee_types::Result<()> {
        Ok(())
    }

    async fn set_conversation_status(&self, _id: &RecordId, _status: ConversationStatus) -> flabee_types::Result<()> {
        Ok(())
    }

    async fn set_conversation_tags(&self, _id: &RecordId, _tags: &[String]) -> flabee_types::Result<()> {
        Ok(())
    }

    async fn update_message(&self, _id: &RecordId, _content: &str) -> flabee_types::Result<()> {
        Ok(())
    }

    async fn daily_message_counts(&self, _cutoff: &str) -> flabee_types::Result<Vec<DailyMessageCount>> {
        Ok(Vec::new())
    }

    async fn channel_message_counts(&self, _cutoff: &str) -> flabee_types::Result<Vec<ChannelMessageCount>> {
        Ok(Vec::new())
    }

    async fn daily_active_conversations(&self, _cutoff: &str) -> flabee_types::Result<Vec<DailyActiveConversations>> {
        Ok(Vec::new())
    }

    async fn conversation_activity(&self, _cutoff: &str) -> flabee_types::Result<Vec<ConversationActivity>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn paging(message_page_size: u32, viewer_page_size: u32) -> PagingConfig {
    PagingConfig {
        message_page_size,
        viewer_page_size,
        ..PagingConfig::default()
    }
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_new_is_empty() {
    let bus = EventBus::new();
    assert!(!bus.has_pending());
    assert!(bus.drain().is_empty());
}

#[wasm_bindgen_test]
fn event_bus_preserves_order() {
    let bus = EventBus::new();
    bus.emit(DashboardEvent::ActionStart { label: "a".to_string() });
    bus.emit(DashboardEvent::ActionEnd);
    let events = bus.drain();
    assert!(matches!(events[0], DashboardEvent::ActionStart { .. }));
    assert!(matches!(events[1], DashboardEvent::ActionEnd));
}

// ─── Pager Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn pager_loads_first_page() {
    let backend = MockBackend::thread(0);
    let mut pager = ConversationListPager::new(2);
    assert_eq!(pager.load(&backend).await.unwrap().len(), 2);
    pager.next_page();
    assert_eq!(pager.load(&backend).await.unwrap().len(), 1);
}

// ─── Cache Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn cache_loads_250_messages_in_two_pages() {
    let backend = MockBackend::thread(250);
    let mut cache = MessageWindowCache::new(&paging(200, 50));
    let id = RecordId::from("t1");
    let messages = cache.get_or_load(&backend, &id).await.unwrap().to_vec();
    assert_eq!(messages.len(), 250);
    assert_eq!(messages[0].id, RecordId::from(1));
    assert_eq!(messages[249].id, RecordId::from(250));
    assert_eq!(backend.calls.get(), 2);
    assert_eq!(cache.state(&id), LoadState::Loaded);
}

#[wasm_bindgen_test]
async fn cache_second_access_is_free() {
    let backend = MockBackend::thread(10);
    let mut cache = MessageWindowCache::new(&paging(200, 50));
    let id = RecordId::from("t1");
    cache.get_or_load(&backend, &id).await.unwrap();
    cache.get_or_load(&backend, &id).await.unwrap();
    assert_eq!(backend.calls.get(), 1);
}

#[wasm_bindgen_test]
async fn cache_viewer_window_grows_backward() {
    let backend = MockBackend::thread(30);
    let mut cache = MessageWindowCache::new(&paging(200, 10));
    let id = RecordId::from("t1");
    let latest = cache.open_latest(&backend, &id).await.unwrap().to_vec();
    assert_eq!(latest.len(), 10);
    assert_eq!(latest[9].id, RecordId::from(30));
    let grown = cache.load_earlier(&backend, &id).await.unwrap();
    assert!(grown.len() > 10);
    assert_eq!(grown.last().unwrap().id, RecordId::from(30));
}

// ─── Export Tests ────────────────────────────────────────

#[wasm_bindgen_test]
async fn export_round_trip() {
    let backend = MockBackend::thread(12);
    let export = export_conversation(&backend, &RecordId::from("t1"), 5, 100).await.unwrap();
    assert_eq!(export.records, 12);
    assert_eq!(parse_jsonl(&export.body).unwrap(), backend.messages);
}
