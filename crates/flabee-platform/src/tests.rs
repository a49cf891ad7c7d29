#[cfg(test)]
mod tests {
    use crate::memory::MemoryBackend;
    use crate::storage::MemoryStorage;
    use crate::supabase::*;
    use crate::connect_backend;
    use flabee_core::cache::MessageWindowCache;
    use flabee_core::ports::{BackendPort, StoragePort};
    use flabee_types::analytics::DailyMessageCount;
    use flabee_types::config::{BackendConfig, PagingConfig};
    use flabee_types::conversation::{Conversation, ConversationStatus};
    use flabee_types::id::RecordId;
    use flabee_types::message::{Message, Role};
    use flabee_types::timestamp::Timestamp;
    use flabee_types::DashboardError;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;
    use serde_json::json;

    fn config() -> BackendConfig {
        BackendConfig {
            url: "https://demo.supabase.co/".to_string(),
            api_key: "service-key".to_string(),
        }
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    // ─── Supabase Request Tests ──────────────────────────────

    #[test]
    fn test_rpc_url() {
        let backend = SupabaseBackend::new(&config());
        assert_eq!(
            backend.rpc_url("list_messages"),
            "https://demo.supabase.co/rest/v1/rpc/list_messages"
        );
    }

    #[test]
    fn test_table_url_orders_daily_views() {
        let backend = SupabaseBackend::new(&config());
        assert_eq!(
            backend.table_url("daily_message_counts", "*", "day", "2024-05-16"),
            "https://demo.supabase.co/rest/v1/daily_message_counts?select=*&day=gte.2024-05-16&order=day.asc"
        );
        assert_eq!(
            backend.table_url("conversations", "status,last_message_at", "last_message_at", "2024-05-16"),
            "https://demo.supabase.co/rest/v1/conversations?select=status,last_message_at&last_message_at=gte.2024-05-16"
        );
    }

    #[test]
    fn test_list_conversations_params_blank_search_is_null() {
        let params = list_conversations_params(Some("   "), 30, 60);
        assert_eq!(params, json!({ "p_search": null, "p_limit": 30, "p_offset": 60 }));
        let params = list_conversations_params(Some(" ana "), 30, 0);
        assert_eq!(params["p_search"], "ana");
    }

    #[test]
    fn test_list_messages_params_keep_id_encoding() {
        let before = Timestamp::new("2024-05-01 10:00:00+00");
        let params = list_messages_params(&RecordId::from(7), Some(&before), 200);
        assert_eq!(
            params,
            json!({ "p_conversation_id": 7, "p_before": "2024-05-01 10:00:00+00", "p_limit": 200 })
        );
        let params = list_messages_params(&RecordId::from("c-1"), None, 50);
        assert_eq!(params["p_conversation_id"], "c-1");
        assert!(params["p_before"].is_null());
    }

    #[test]
    fn test_parse_rows_null_is_empty() {
        let rows: Vec<Conversation> = parse_rows("null").unwrap();
        assert!(rows.is_empty());
        let rows: Vec<Conversation> = parse_rows("  ").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_rows_defaults_nulls() {
        let body = r#"[{"conversation_id":"c1","title":null,"user_label":null,"status":null,"tags":null,
                        "last_message_at":null,"msg_count":null,"last_channel":null}]"#;
        let rows: Vec<Conversation> = parse_rows(body).unwrap();
        assert_eq!(rows[0].status, ConversationStatus::Open);
        assert!(rows[0].tags.is_empty());
        assert_eq!(rows[0].msg_count, 0);
    }

    #[test]
    fn test_parse_rows_daily_counts() {
        let body = r#"[{"day":"2024-05-01","total":12,"user_msgs":7,"assistant_msgs":null}]"#;
        let rows: Vec<DailyMessageCount> = parse_rows(body).unwrap();
        assert_eq!(rows[0].total, 12);
        assert_eq!(rows[0].assistant_msgs, 0);
    }

    #[test]
    fn test_parse_rows_rejects_garbage() {
        let result: flabee_types::Result<Vec<Conversation>> = parse_rows("<html>");
        assert!(matches!(result, Err(DashboardError::Serialization(_))));
    }

    #[test]
    fn test_backend_message_prefers_postgrest_message() {
        let body = r#"{"code":"42883","message":"function list_messages does not exist"}"#;
        assert_eq!(backend_message(body), "function list_messages does not exist");
        assert_eq!(backend_message(" Bad Gateway \n"), "Bad Gateway");
    }

    // ─── MemoryBackend Tests ─────────────────────────────────

    fn small_backend() -> MemoryBackend {
        let messages = vec![
            Message::new(1, "a", Role::User, "hello", "2024-05-01T10:00:00Z"),
            Message::new(2, "a", Role::Assistant, "hi there", "2024-05-01T10:01:00Z"),
            Message::new(3, "a", Role::User, "same second", "2024-05-01T10:01:00Z"),
            Message::new(4, "a", Role::Assistant, "Refund issued", "2024-05-01T10:02:00Z"),
        ];
        let mut conv = Conversation::new("a");
        conv.user_label = Some("Carla".to_string());
        let other = vec![Message::new(5, "b", Role::User, "ping", "2024-05-02T08:00:00Z")];
        MemoryBackend::new()
            .with_conversation(conv, messages)
            .with_conversation(Conversation::new("b"), other)
    }

    #[test]
    fn test_memory_derives_counts() {
        let backend = small_backend();
        let rows = block_on(backend.list_conversations(None, 10, 0)).unwrap();
        // most recent first
        assert_eq!(rows[0].conversation_id, RecordId::from("b"));
        assert_eq!(rows[1].msg_count, 4);
        assert_eq!(rows[1].last_message_at.as_ref().unwrap().as_str(), "2024-05-01T10:02:00Z");
    }

    #[test]
    fn test_memory_search_label_and_last_message() {
        let backend = small_backend();
        let by_label = block_on(backend.list_conversations(Some("carla"), 10, 0)).unwrap();
        assert_eq!(by_label.len(), 1);
        let by_message = block_on(backend.list_conversations(Some("REFUND"), 10, 0)).unwrap();
        assert_eq!(by_message.len(), 1);
        let none = block_on(backend.list_conversations(Some("hello"), 10, 0)).unwrap();
        assert!(none.is_empty(), "only the last message is searched");
    }

    #[test]
    fn test_memory_offset_past_end() {
        let backend = small_backend();
        assert!(block_on(backend.list_conversations(None, 10, 10)).unwrap().is_empty());
    }

    #[test]
    fn test_memory_list_messages_newest_first_with_tie_break() {
        let backend = small_backend();
        let rows = block_on(backend.list_messages(&RecordId::from("a"), None, 10)).unwrap();
        let ids: Vec<RecordId> = rows.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec![RecordId::from(4), RecordId::from(3), RecordId::from(2), RecordId::from(1)]);
    }

    #[test]
    fn test_memory_list_messages_strictly_before() {
        let backend = small_backend();
        let before = Timestamp::new("2024-05-01T10:01:00Z");
        let rows = block_on(backend.list_messages(&RecordId::from("a"), Some(&before), 10)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, RecordId::from(1));
    }

    #[test]
    fn test_memory_mutations() {
        let backend = small_backend();
        let id = RecordId::from("a");
        block_on(backend.rename_conversation(&id, "Renamed")).unwrap();
        block_on(backend.set_conversation_status(&id, ConversationStatus::Closed)).unwrap();
        block_on(backend.set_conversation_tags(&id, &["x".to_string()])).unwrap();
        block_on(backend.update_message(&RecordId::from(2), "edited")).unwrap();

        let conv = block_on(backend.list_conversations(Some("carla"), 10, 0)).unwrap().remove(0);
        assert_eq!(conv.title.as_deref(), Some("Renamed"));
        assert_eq!(conv.status, ConversationStatus::Closed);
        assert_eq!(conv.tags, vec!["x"]);
        let rows = block_on(backend.list_messages(&id, None, 10)).unwrap();
        assert!(rows.iter().any(|m| m.text() == "edited"));
    }

    #[test]
    fn test_memory_mutation_unknown_id() {
        let backend = small_backend();
        let err = block_on(backend.rename_conversation(&RecordId::from("zzz"), "x")).unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)));
        let err = block_on(backend.update_message(&RecordId::from(99), "x")).unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)));
    }

    #[test]
    fn test_memory_demo_analytics_respect_cutoff() {
        let backend = MemoryBackend::demo(now());
        let all = block_on(backend.daily_message_counts("2024-05-01")).unwrap();
        assert_eq!(all.len(), 30);
        let week = block_on(backend.daily_message_counts("2024-06-09")).unwrap();
        assert_eq!(week.len(), 7);
        assert!(week.windows(2).all(|w| w[0].day < w[1].day));
        let channels = block_on(backend.channel_message_counts("2024-06-09")).unwrap();
        assert_eq!(channels.len(), 21);
        let activity = block_on(backend.conversation_activity("2024-06-09")).unwrap();
        assert_eq!(activity.len(), 3);
        assert_eq!(
            activity.iter().filter(|a| a.status == ConversationStatus::Closed).count(),
            1
        );
    }

    #[test]
    fn test_memory_demo_thread_loads_through_cache() {
        let backend = MemoryBackend::demo(now());
        let paging = PagingConfig {
            message_page_size: 50,
            ..PagingConfig::default()
        };
        let mut cache = MessageWindowCache::new(&paging);
        let messages = block_on(cache.get_or_load(&backend, &RecordId::from("c-1003"))).unwrap();
        assert_eq!(messages.len(), 120);
        assert!(messages
            .windows(2)
            .all(|w| w[0].created_at.cmp_instant(&w[1].created_at).is_le()));
    }

    #[test]
    fn test_connect_backend_without_url_uses_demo() {
        let backend = connect_backend(&BackendConfig::default());
        assert_eq!(backend.backend_name(), "memory");
        let backend = connect_backend(&config());
        assert_eq!(backend.backend_name(), "supabase");
    }

    // ─── MemoryStorage Tests ─────────────────────────────────

    #[test]
    fn test_memory_storage_set_get_delete() {
        let storage = MemoryStorage::new();
        assert!(!block_on(storage.exists("flabee:config")).unwrap());
        block_on(storage.set("flabee:config", b"{}")).unwrap();
        assert_eq!(block_on(storage.get("flabee:config")).unwrap(), Some(b"{}".to_vec()));
        assert!(block_on(storage.exists("flabee:config")).unwrap());
        block_on(storage.delete("flabee:config")).unwrap();
        assert!(block_on(storage.get("flabee:config")).unwrap().is_none());
        assert_eq!(storage.backend_name(), "memory");
    }
}
