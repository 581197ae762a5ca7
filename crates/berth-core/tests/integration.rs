//! Integration tests for berth-core.
//!
//! These tests drive the public API the way the dashboard's update loop does.

use berth_core::{
    event_channel, spawn_backfill, BackfillError, BackfillRequest, BackfillSource, EntityId,
    LogEntry, LogFilter, LogScope, LogStream, Metric, ScalePolicy, Session, SessionConfig,
    SessionEvent,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

fn line(ts: i64, entity: &str, stream: LogStream, msg: &str) -> LogEntry {
    LogEntry::new(ts, entity, stream, msg)
}

// =============================================================================
// Metric history
// =============================================================================

#[test]
fn test_metric_history_through_events() {
    let config = SessionConfig::from_yaml_str("metric_history: 4").expect("valid config");
    let mut session = Session::new(config);
    let (tx, mut rx) = event_channel();

    for v in 1..=6 {
        tx.send(SessionEvent::Sample {
            entity: EntityId::new("api"),
            metric: Metric::Cpu,
            value: f64::from(v) * 10.0,
        })
        .expect("receiver alive");
    }
    assert_eq!(session.drain(&mut rx), 6);
    assert_eq!(
        session.snapshot(&EntityId::new("api"), Metric::Cpu),
        vec![30.0, 40.0, 50.0, 60.0]
    );
}

#[test]
fn test_group_aggregate_and_ceiling() {
    let mut session = Session::default();
    for v in [10.0, 20.0, 30.0] {
        session.push_sample("api", Metric::Cpu, v);
    }
    for v in [5.0, 5.0] {
        session.push_sample("worker", Metric::Cpu, v);
    }
    let ids = [EntityId::new("api"), EntityId::new("worker")];
    let total = session.aggregate(Metric::Cpu, &ids);
    assert_eq!(total, vec![10.0, 25.0, 35.0]);
    assert_eq!(session.scale_policy(Metric::Cpu).ceiling_for(&total), 50.0);
}

#[test]
fn test_configured_limit_pins_ceiling() {
    let config = SessionConfig::from_yaml_str("cpu_limit: 150.0").expect("valid config");
    let session = Session::new(config);
    assert_eq!(session.scale_policy(Metric::Cpu), ScalePolicy::Limit(150.0));
    assert_eq!(session.scale_policy(Metric::Cpu).ceiling_for(&[400.0]), 150.0);
}

// =============================================================================
// Log reconciliation
// =============================================================================

#[test]
fn test_backfill_merge_newest_first_answer() {
    let mut session = Session::default();
    let scope = LogScope::Entity(EntityId::new("api"));
    let request = session.activate_logs(scope.clone()).expect("first activation");

    session.push_log_entry(line(200, "api", LogStream::Stdout, "live a"));
    session.push_log_entry(line(201, "api", LogStream::Stderr, "live b"));

    // Newest-first, includes an entry at the watermark second.
    let history = vec![
        line(200, "api", LogStream::Stdout, "dup"),
        line(150, "api", LogStream::Stdout, "old b"),
        line(150, "api", LogStream::Stdout, "old a"),
        line(100, "api", LogStream::Stderr, "oldest"),
    ];
    session.resolve_backfill(&scope, request.ticket, Ok(history));

    let messages: Vec<_> = session
        .filtered_log_entries(&scope, &LogFilter::all())
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["oldest", "old a", "old b", "live a", "live b"]);

    let stderr_only = LogFilter::all().with_stream(LogStream::Stderr);
    let stderr = session.filtered_log_entries(&scope, &stderr_only);
    assert_eq!(stderr.len(), 2);
}

#[test]
fn test_failed_backfill_keeps_stream() {
    let mut session = Session::default();
    let scope = LogScope::group(["api", "db"]);
    let request = session.activate_logs(scope.clone()).expect("first activation");
    session.push_log_entry(line(10, "db", LogStream::Stdout, "ready"));
    session.resolve_backfill(
        &scope,
        request.ticket,
        Err(BackfillError::Transport("connection reset".into())),
    );
    let view = session.log_view(&scope).expect("view open");
    assert!(view.is_backfilled());
    assert_eq!(view.len(), 1);
    assert!(session.activate_logs(scope).is_none());
}

struct ScriptedSource {
    entries: Vec<LogEntry>,
}

impl BackfillSource for ScriptedSource {
    fn fetch(
        &self,
        request: BackfillRequest,
    ) -> impl Future<Output = Result<Vec<LogEntry>, BackfillError>> + Send {
        let entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| request.scope.contains(&e.entity))
            .take(request.limit)
            .cloned()
            .collect();
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(entries)
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_backfill_task_round_trip() {
    let mut session = Session::default();
    let (tx, mut rx) = event_channel();
    let scope = LogScope::Entity(EntityId::new("api"));
    let request = session.activate_logs(scope.clone()).expect("first activation");

    let source = Arc::new(ScriptedSource {
        entries: vec![
            line(1, "api", LogStream::Stdout, "boot"),
            line(2, "db", LogStream::Stdout, "other"),
        ],
    });
    let timeout = session.config().backfill.timeout();
    let handle = spawn_backfill(source, request, timeout, tx.clone());

    // Streamed lines keep arriving while the query runs.
    tx.send(SessionEvent::Log(line(5, "api", LogStream::Stdout, "tick")))
        .expect("receiver alive");
    handle.await.expect("task completes");

    assert_eq!(session.drain(&mut rx), 2);
    let messages: Vec<_> = session
        .filtered_log_entries(&scope, &LogFilter::all())
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["boot", "tick"]);
}
