//! Request/response correlation through a context.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use grnbind::channel::{ChannelError, MemoryChannel, RequestId};
use grnbind::context::{Context, ContextError, MatchPolicy};
use grnbind::schema::{Schema, TableOptions};
use grnbind::select::{Coercions, FieldValue, SelectCommand};
use serde_json::Value;

const EMPTY_RESULT: &str = "[[[0]]]";

#[tokio::test]
async fn test_stale_response_discarded() {
    let channel = MemoryChannel::starting_at(7);
    channel.push_response(5, r#"[[[5]]]"#);
    channel.push_response(7, r#"[[[1],[["_id","UInt32"]],[1]]]"#);
    let context = Context::new(channel);

    let payload = context.execute("select Entries").await.unwrap();
    assert_eq!(payload, r#"[[[1],[["_id","UInt32"]],[1]]]"#);
    assert_eq!(context.channel().sent_commands(), vec!["select Entries"]);
}

#[tokio::test]
async fn test_timeout_on_silent_channel() {
    let context = Context::new(MemoryChannel::new()).with_timeout(Duration::from_millis(50));

    let err = context.execute("select Entries").await.unwrap_err();
    assert!(matches!(err, ContextError::Timeout(t) if t == Duration::from_millis(50)));
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_channel_closed_while_waiting() {
    let context = Arc::new(Context::new(MemoryChannel::new()));

    let closer = context.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        closer.channel().close();
    });

    let err = context.execute("select Entries").await.unwrap_err();
    assert!(matches!(err, ContextError::ChannelClosed(RequestId(1))));
    assert!(err.is_closed());
}

#[tokio::test]
async fn test_send_on_closed_channel() {
    let channel = MemoryChannel::new();
    channel.close();
    let context = Context::new(channel);

    let err = context.execute("status").await.unwrap_err();
    assert!(matches!(err, ContextError::Channel(ChannelError::Closed)));
    assert!(err.is_closed());
}

#[tokio::test]
async fn test_strict_policy_rejects_future_id() {
    let channel = MemoryChannel::starting_at(3);
    channel.push_response(4, EMPTY_RESULT);
    let context = Context::new(channel);

    let err = context.execute("select Entries").await.unwrap_err();
    match err {
        ContextError::UnexpectedResponse { expected, received } => {
            assert_eq!(expected, RequestId(3));
            assert_eq!(received, RequestId(4));
        }
        other => panic!("expected UnexpectedResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_discard_policy_skips_future_id() {
    let channel = MemoryChannel::starting_at(3);
    channel.push_response(4, r#"[[[4]]]"#);
    channel.push_response(3, r#"[[[3]]]"#);
    let context = Context::new(channel).with_match_policy(MatchPolicy::Discard);

    assert_eq!(context.execute("select Entries").await.unwrap(), r#"[[[3]]]"#);
}

#[tokio::test]
async fn test_select_parses_drill_downs() {
    let channel = MemoryChannel::new().with_responder(|_, _| {
        Some(
            r#"[[[2],[["_key","ShortText"]],["a"],["b"]],[[1],[["_key","ShortText"],["_nsubrecs","Int32"]],["rust",2]]]"#
                .to_string(),
        )
    });
    let context = Context::new(channel);

    let command = SelectCommand::new("Entries").option("drill-down", "tag");
    let result = context.select(&command).await.unwrap();

    assert_eq!(result.n_hits, 2);
    assert_eq!(result.records().len(), 2);
    let tag = result.drill_down("tag").unwrap();
    assert_eq!(tag.records()[0].get("_key").and_then(|v| v.as_str()), Some("rust"));
    assert_eq!(
        context.channel().sent_commands(),
        vec![r#"select Entries --drilldown "tag""#]
    );
}

fn upper_case(value: &Value) -> Option<FieldValue> {
    value
        .as_str()
        .map(|s| FieldValue::Raw(Value::String(s.to_uppercase())))
}

#[tokio::test]
async fn test_custom_coercions_reach_records() {
    let channel = MemoryChannel::new().with_responder(|_, _| {
        Some(r#"[[[1],[["_key","ShortText"],["issued","Time"]],["rust",1234567890]]]"#.to_string())
    });
    let context =
        Context::new(channel).with_coercions(Coercions::empty().with("ShortText", upper_case));

    let result = context.select(&SelectCommand::new("Entries")).await.unwrap();
    let record = &result.records()[0];

    assert_eq!(record.get("_key").and_then(|v| v.as_str()), Some("RUST"));
    assert_eq!(record.get("issued").and_then(|v| v.as_i64()), Some(1234567890));
    assert!(record.get("issued").and_then(|v| v.as_time()).is_none());
}

#[tokio::test]
async fn test_concurrent_selects_get_own_responses() {
    // Answers with the command's limit as the hit count.
    let channel = MemoryChannel::new().with_responder(|_, command| {
        let limit = command.rsplit('"').nth(1)?;
        Some(format!("[[[{}]]]", limit))
    });
    let context = Arc::new(Context::new(channel));

    let tasks = (1..=16u64).map(|limit| {
        let context = context.clone();
        async move {
            let command = SelectCommand::new("Entries").option("limit", limit);
            let result = context.select(&command).await.unwrap();
            (limit, result.n_hits)
        }
    });

    for (limit, n_hits) in join_all(tasks).await {
        assert_eq!(limit, n_hits);
    }
    assert_eq!(context.channel().sent_commands().len(), 16);
}

#[tokio::test]
async fn test_schema_lookup() {
    let schema = Schema::define(|schema| {
        schema.create_table("Users", TableOptions::hash().key_type("ShortText"), |table| {
            table.short_text("name");
        });
    });
    let context = Context::new(MemoryChannel::new()).with_schema(schema);

    let users = context.table("Users").unwrap();
    assert!(users.has_column("name"));
    assert!(users.has_column("_key"));
    assert!(context.table("Missing").is_none());
}
