#[cfg(test)]
mod tests {
    use crate::{DashboardError, Result};
    use crate::analytics::*;
    use crate::config::*;
    use crate::conversation::*;
    use crate::event::*;
    use crate::id::*;
    use crate::message::*;
    use crate::timestamp::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    // ─── Timestamp Tests ─────────────────────────────────────

    #[test]
    fn test_timestamp_parses_zulu() {
        let ts = Timestamp::new("2024-05-01T10:15:30Z");
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap();
        assert_eq!(ts.parse(), Some(expected));
    }

    #[test]
    fn test_timestamp_parses_offset() {
        let ts = Timestamp::new("2024-05-01T12:15:30+02:00");
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap();
        assert_eq!(ts.parse(), Some(expected));
    }

    #[test]
    fn test_timestamp_parses_postgres_text_form() {
        let ts = Timestamp::new("2024-05-01 10:15:30.123456+00");
        let dt = ts.parse().expect("postgres timestamp should parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 10:15:30");
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let ts = Timestamp::new("2024-05-01T10:15:30");
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap();
        assert_eq!(ts.parse(), Some(expected));
    }

    #[test]
    fn test_timestamp_display_formats_utc() {
        let ts = Timestamp::new("2024-05-01T12:15:30+02:00");
        assert_eq!(ts.display(), "2024-05-01 10:15 UTC");
    }

    #[test]
    fn test_timestamp_display_falls_back_to_raw() {
        let ts = Timestamp::new("yesterday-ish");
        assert!(ts.parse().is_none());
        assert_eq!(ts.display(), "yesterday-ish");
    }

    #[test]
    fn test_timestamp_short_truncates_to_seconds() {
        let ts = Timestamp::new("2024-05-01T10:15:30.999+00:00");
        assert_eq!(ts.short(), "2024-05-01T10:15:30");
        assert_eq!(Timestamp::new("2024").short(), "2024");
    }

    #[test]
    fn test_timestamp_cmp_uses_instants() {
        let a = Timestamp::new("2024-05-01T12:00:00+02:00");
        let b = Timestamp::new("2024-05-01T11:00:00Z");
        // 10:00Z vs 11:00Z, even though "12" sorts after "11" as text
        assert_eq!(a.cmp_instant(&b), std::cmp::Ordering::Less);
    }

    #[test]
    fn test_timestamp_serializes_transparently() {
        let ts = Timestamp::new("2024-05-01 10:15:30+00");
        assert_eq!(serde_json::to_string(&ts).unwrap(), r#""2024-05-01 10:15:30+00""#);
    }

    // ─── RecordId Tests ──────────────────────────────────────

    #[test]
    fn test_record_id_keeps_encoding() {
        let int: RecordId = serde_json::from_str("42").unwrap();
        let text: RecordId = serde_json::from_str(r#""9f1c""#).unwrap();
        assert_eq!(int, RecordId::Int(42));
        assert_eq!(text, RecordId::Text("9f1c".to_string()));
        assert_eq!(serde_json::to_string(&int).unwrap(), "42");
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""9f1c""#);
        assert_eq!(int.to_string(), "42");
    }

    // ─── Conversation Tests ──────────────────────────────────

    #[test]
    fn test_conversation_deserializes_view_row() {
        let row = json!({
            "conversation_id": "c-1",
            "title": "Refund",
            "user_label": "alice",
            "status": "closed",
            "tags": ["billing", "vip"],
            "last_message_at": "2024-05-01T10:15:30Z",
            "msg_count": 12,
            "last_channel": "whatsapp"
        });
        let conv: Conversation = serde_json::from_value(row).unwrap();
        assert_eq!(conv.conversation_id, RecordId::from("c-1"));
        assert_eq!(conv.status, ConversationStatus::Closed);
        assert_eq!(conv.tags, vec!["billing", "vip"]);
        assert_eq!(conv.msg_count, 12);
        assert_eq!(conv.channel(), "whatsapp");
    }

    #[test]
    fn test_conversation_nulls_fall_back_to_defaults() {
        let row = json!({
            "conversation_id": 7,
            "title": null,
            "user_label": null,
            "status": null,
            "tags": null,
            "last_message_at": null,
            "msg_count": null,
            "last_channel": null
        });
        let conv: Conversation = serde_json::from_value(row).unwrap();
        assert_eq!(conv.status, ConversationStatus::Open);
        assert!(conv.tags.is_empty());
        assert_eq!(conv.msg_count, 0);
        assert_eq!(conv.list_name(), "Chat");
        assert_eq!(conv.heading(), "Conversation");
        assert_eq!(conv.channel(), "unknown");
        assert_eq!(conv.last_message_short(), "");
    }

    #[test]
    fn test_conversation_empty_label_counts_as_missing() {
        let mut conv = Conversation::new("c");
        conv.user_label = Some(String::new());
        assert_eq!(conv.list_name(), "Chat");
    }

    #[test]
    fn test_conversation_apply_updates() {
        let mut conv = Conversation::new("c");
        conv.apply(&ConversationUpdate::Rename("New title".to_string()));
        conv.apply(&ConversationUpdate::SetStatus(ConversationStatus::Closed));
        conv.apply(&ConversationUpdate::SetTags(vec!["a".to_string()]));
        assert_eq!(conv.title.as_deref(), Some("New title"));
        assert_eq!(conv.status, ConversationStatus::Closed);
        assert_eq!(conv.tags, vec!["a"]);
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags(" billing, vip ,, ,refund"), vec!["billing", "vip", "refund"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_format_tags() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_tags(&tags), "a, b");
        assert_eq!(parse_tags(&format_tags(&tags)), tags);
    }

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_keeps_unknown_columns() {
        let row = json!({
            "id": 101,
            "conversation_id": "c-1",
            "role": "assistant",
            "content": "Hi there",
            "created_at": "2024-05-01 10:15:30.5+00",
            "meta": {"model": "x", "tokens": 12},
            "channel": "web",
            "score": 0.5
        });
        let msg: Message = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.extra.get("channel"), Some(&json!("web")));
        assert_eq!(serde_json::to_value(&msg).unwrap(), row);
    }

    #[test]
    fn test_message_null_meta_round_trips() {
        let row = json!({
            "id": "m1",
            "role": "user",
            "content": "hello",
            "created_at": "2024-05-01T10:00:00Z",
            "meta": null
        });
        let msg: Message = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(msg.meta, Some(serde_json::Value::Null));
        assert!(!msg.has_meta());
        assert_eq!(serde_json::to_value(&msg).unwrap(), row);
    }

    #[test]
    fn test_message_absent_meta_stays_absent() {
        let row = json!({
            "id": "m1",
            "role": "user",
            "content": "hello",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let msg: Message = serde_json::from_value(row.clone()).unwrap();
        assert!(msg.meta.is_none());
        assert_eq!(serde_json::to_value(&msg).unwrap(), row);
    }

    #[test]
    fn test_message_null_columns_round_trip() {
        let row = json!({
            "id": 1,
            "conversation_id": null,
            "role": "user",
            "content": null,
            "created_at": "2024-05-01T10:00:00Z",
            "meta": null
        });
        let msg: Message = serde_json::from_value(row.clone()).unwrap();
        assert!(msg.conversation_id.is_null());
        assert!(msg.content.is_null());
        assert_eq!(msg.text(), "");
        assert_eq!(serde_json::to_value(&msg).unwrap(), row);
    }

    #[test]
    fn test_message_missing_content_stays_missing() {
        let row = json!({"id": 1, "role": "user", "created_at": "2024-05-01T10:00:00Z"});
        let msg: Message = serde_json::from_value(row.clone()).unwrap();
        assert!(msg.content.is_absent());
        assert!(msg.conversation_id.is_absent());
        assert_eq!(msg.preview(10), "");
        assert_eq!(serde_json::to_value(&msg).unwrap(), row);
    }

    #[test]
    fn test_message_set_content_replaces_null() {
        let row = json!({"id": 1, "role": "user", "content": null, "created_at": "2024-05-01T10:00:00Z"});
        let mut msg: Message = serde_json::from_value(row).unwrap();
        msg.set_content("filled");
        assert_eq!(serde_json::to_value(&msg).unwrap()["content"], "filled");
    }

    #[test]
    fn test_message_keeps_unknown_role() {
        let row = json!({
            "id": "m1",
            "role": "system",
            "content": "be brief",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let msg: Message = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(msg.role, Role::Other("system".to_string()));
        assert_eq!(msg.role.as_str(), "system");
        assert_eq!(serde_json::to_value(&msg).unwrap(), row);
    }

    #[test]
    fn test_role_known_names_map_to_variants() {
        assert_eq!(Role::from("assistant".to_string()), Role::Assistant);
        assert_eq!(String::from(Role::User), "user");
        assert_eq!(String::from(Role::Other("tool".to_string())), "tool");
    }

    #[test]
    fn test_message_preview_single_line() {
        let msg = Message::new(1, "c", Role::User, "line one\nline two", "2024-05-01T10:00:00Z");
        assert_eq!(msg.preview(60), "line one line two");
        assert_eq!(msg.preview(4), "line");
    }

    #[test]
    fn test_message_has_meta() {
        let msg = Message::new(1, "c", Role::User, "x", "2024-05-01T10:00:00Z");
        assert!(!msg.has_meta());
        assert!(!msg.clone().with_meta(json!({})).has_meta());
        assert!(msg.with_meta(json!({"k": 1})).has_meta());
    }

    // ─── Analytics Tests ─────────────────────────────────────

    #[test]
    fn test_analytics_range_cutoff() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(AnalyticsRange::Week.cutoff(today), "2024-03-24");
        assert_eq!(AnalyticsRange::Month.cutoff(today), "2024-03-01");
        assert_eq!(AnalyticsRange::Quarter.cutoff(today), "2024-01-01");
    }

    #[test]
    fn test_analytics_range_from_days() {
        assert_eq!(AnalyticsRange::from_days(7), Some(AnalyticsRange::Week));
        assert_eq!(AnalyticsRange::from_days(90), Some(AnalyticsRange::Quarter));
        assert_eq!(AnalyticsRange::from_days(14), None);
        assert_eq!(AnalyticsRange::default(), AnalyticsRange::Month);
    }

    #[test]
    fn test_analytics_rows_tolerate_nulls() {
        let row: DailyMessageCount = serde_json::from_value(json!({
            "day": "2024-05-01", "total": null, "user_msgs": 3
        }))
        .unwrap();
        assert_eq!(row.total, 0);
        assert_eq!(row.user_msgs, 3);
        assert_eq!(row.assistant_msgs, 0);
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.paging.conversation_page_size, 30);
        assert_eq!(config.paging.message_page_size, 200);
        assert_eq!(config.paging.viewer_page_size, 50);
        assert_eq!(config.paging.max_pages, 100);
        assert_eq!(config.analytics.range(), AnalyticsRange::Month);
        assert!(!config.backend.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"paging": {"message_page_size": 500}}"#).unwrap();
        assert_eq!(config.paging.message_page_size, 500);
        assert_eq!(config.paging.viewer_page_size, 50);
        assert_eq!(config.analytics.cache_ttl_secs, 60);
    }

    #[test]
    fn test_config_rejects_zero_page_size() {
        let mut config = DashboardConfig::default();
        config.paging.message_page_size = 0;
        assert!(matches!(config.validate(), Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_config_rejects_zero_page_cap() {
        let mut config = DashboardConfig::default();
        config.paging.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_unknown_range() {
        let mut config = DashboardConfig::default();
        config.analytics.range_days = 14;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_rest_base() {
        let backend = BackendConfig {
            url: " https://xyz.supabase.co/ ".to_string(),
            api_key: "k".to_string(),
        };
        assert!(backend.is_configured());
        assert_eq!(backend.rest_base(), "https://xyz.supabase.co/rest/v1");
    }

    // ─── Event / Error Tests ─────────────────────────────────

    #[test]
    fn test_event_serialization() {
        let event = DashboardEvent::ExportReady {
            file_name: "conversation-1.jsonl".to_string(),
            body: String::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ExportReady"));
    }

    #[test]
    fn test_error_display() {
        let err = DashboardError::Backend { status: 500, message: "boom".to_string() };
        assert_eq!(err.to_string(), "Backend error (HTTP 500): boom");
        let err = DashboardError::PageLimit { pages: 3 };
        assert!(err.to_string().contains("3 pages"));
    }

    #[test]
    fn test_error_from_serde() {
        let err: DashboardError = serde_json::from_str::<Message>("{").unwrap_err().into();
        assert!(matches!(err, DashboardError::Serialization(_)));
    }

    #[test]
    fn test_result_alias() {
        let ok: Result<u8> = Ok(1);
        assert_eq!(ok.unwrap(), 1);
    }
}
