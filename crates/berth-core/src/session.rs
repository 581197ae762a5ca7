//! Dashboard session: the single owner of all retained state.
//!
//! Network tasks never touch retained state directly. They post
//! [`SessionEvent`]s on an unbounded channel and the render loop calls
//! [`Session::drain`] once per frame, so every mutation happens on one
//! execution path and no locking is needed.

use crate::config::SessionConfig;
use crate::entity::{EntityId, Metric};
use crate::error::BackfillError;
use crate::history::MetricRegistry;
use crate::log::{LogEntry, LogFilter, LogScope};
use crate::reconcile::{BackfillRequest, BackfillTicket, LogSeries};
use crate::scale::ScalePolicy;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Something delivered to the session's update path.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// One metric tick for one entity.
    Sample {
        entity: EntityId,
        metric: Metric,
        value: f64,
    },
    /// One streamed log line.
    Log(LogEntry),
    /// Answer to a historical log query.
    Backfill {
        ticket: BackfillTicket,
        scope: LogScope,
        result: Result<Vec<LogEntry>, BackfillError>,
    },
}

/// Sending half handed to network tasks.
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;
/// Receiving half drained by the render loop.
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Create the event channel for one session.
#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Transport seam for the historical log query.
pub trait BackfillSource: Send + Sync + 'static {
    /// Run `request`. Result order is not assumed.
    fn fetch(
        &self,
        request: BackfillRequest,
    ) -> impl Future<Output = Result<Vec<LogEntry>, BackfillError>> + Send;
}

/// Posts exactly one [`SessionEvent::Backfill`] for a ticket.
///
/// Dropped unanswered (the fetch panicked or the task was aborted), it posts
/// [`BackfillError::Aborted`] so the view never stays pending.
struct BackfillReply {
    ticket: BackfillTicket,
    scope: Option<LogScope>,
    events: EventSender,
}

impl BackfillReply {
    fn send(&mut self, result: Result<Vec<LogEntry>, BackfillError>) {
        let Some(scope) = self.scope.take() else {
            return;
        };
        let ticket = self.ticket;
        if self
            .events
            .send(SessionEvent::Backfill {
                ticket,
                scope,
                result,
            })
            .is_err()
        {
            tracing::debug!(ticket = ticket.0, "session gone before backfill resolved");
        }
    }
}

impl Drop for BackfillReply {
    fn drop(&mut self) {
        if self.scope.is_some() {
            tracing::warn!(ticket = self.ticket.0, "backfill task ended without an answer");
            self.send(Err(BackfillError::Aborted));
        }
    }
}

/// Run one historical query on the tokio runtime and post the answer back.
///
/// The query is bounded by `timeout`; expiry is reported as
/// [`BackfillError::TimedOut`] and never retried. A panicking fetch or an
/// aborted handle is reported as [`BackfillError::Aborted`].
pub fn spawn_backfill<S: BackfillSource>(
    source: Arc<S>,
    request: BackfillRequest,
    timeout: Duration,
    events: EventSender,
) -> JoinHandle<()> {
    // Built outside the task so an abort before the first poll still answers.
    let mut reply = BackfillReply {
        ticket: request.ticket,
        scope: Some(request.scope.clone()),
        events,
    };
    tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, source.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(BackfillError::TimedOut(timeout)),
        };
        reply.send(result);
    })
}

/// All retained metric and log state for one connected host.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    metrics: MetricRegistry,
    views: HashMap<LogScope, LogSeries>,
    next_ticket: u64,
}

impl Session {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            metrics: MetricRegistry::new(config.metric_history),
            views: HashMap::new(),
            next_ticket: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &MetricRegistry {
        &self.metrics
    }

    /// Record a metric tick.
    pub fn push_sample(&mut self, entity: impl Into<EntityId>, metric: Metric, value: f64) {
        self.push_sample_at(entity, metric, value, Instant::now());
    }

    /// Record a metric tick observed at `now`.
    pub fn push_sample_at(
        &mut self,
        entity: impl Into<EntityId>,
        metric: Metric,
        value: f64,
        now: Instant,
    ) {
        self.metrics.push(entity.into(), metric, value, now);
    }

    /// Route a streamed log line to every active view that follows its
    /// entity. Returns how many views took it.
    pub fn push_log_entry(&mut self, entry: LogEntry) -> usize {
        let mut accepted = 0;
        for view in self.views.values_mut() {
            if view.scope().contains(&entry.entity) {
                view.push(entry.clone());
                accepted += 1;
            }
        }
        accepted
    }

    /// Open (or re-focus) a log view. Returns the historical query to run
    /// when the view has never been backfilled.
    pub fn activate_logs(&mut self, scope: LogScope) -> Option<BackfillRequest> {
        let ticket = BackfillTicket(self.next_ticket);
        let log_history = self.config.log_history;
        let window = self.config.backfill.window();
        let limit = self.config.backfill.limit;
        let view = self
            .views
            .entry(scope)
            .or_insert_with_key(|scope| LogSeries::new(scope.clone(), log_history, window, limit));
        let request = view.activate(ticket);
        if request.is_some() {
            self.next_ticket += 1;
        }
        request
    }

    /// Close a log view, dropping its history. Returns false when it was not
    /// open.
    pub fn deactivate_logs(&mut self, scope: &LogScope) -> bool {
        let removed = self.views.remove(scope).is_some();
        if removed {
            tracing::debug!(scope = ?scope, "log view closed");
        }
        removed
    }

    /// Deliver the answer of a historical query to its view.
    pub fn resolve_backfill(
        &mut self,
        scope: &LogScope,
        ticket: BackfillTicket,
        result: Result<Vec<LogEntry>, BackfillError>,
    ) -> Option<usize> {
        match self.views.get_mut(scope) {
            Some(view) => view.resolve_backfill(ticket, result),
            None => {
                tracing::debug!(
                    scope = ?scope,
                    ticket = ticket.0,
                    "backfill for closed view dropped"
                );
                None
            }
        }
    }

    #[must_use]
    pub fn log_view(&self, scope: &LogScope) -> Option<&LogSeries> {
        self.views.get(scope)
    }

    /// Oldest-first samples of one metric; empty when nothing arrived yet.
    #[must_use]
    pub fn snapshot(&self, entity: &EntityId, metric: Metric) -> Vec<f64> {
        self.metrics.snapshot(entity, metric)
    }

    /// Right-aligned sum of one metric across several entities.
    pub fn aggregate<'a, I>(&self, metric: Metric, entities: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        self.metrics.aggregate(metric, entities)
    }

    /// Entries of an open view that pass `filter`; empty for closed views.
    #[must_use]
    pub fn filtered_log_entries(&self, scope: &LogScope, filter: &LogFilter) -> Vec<LogEntry> {
        self.views
            .get(scope)
            .map(|view| view.filtered(filter))
            .unwrap_or_default()
    }

    /// Ceiling policy for a metric: configured hard limits win over auto
    /// scaling.
    #[must_use]
    pub fn scale_policy(&self, metric: Metric) -> ScalePolicy {
        match metric {
            Metric::Cpu => ScalePolicy::for_limit(self.config.cpu_limit),
            Metric::Memory => ScalePolicy::for_limit(self.config.memory_limit),
            _ => ScalePolicy::Auto,
        }
    }

    /// Apply one event on the update path.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Sample {
                entity,
                metric,
                value,
            } => self.push_sample(entity, metric, value),
            SessionEvent::Log(entry) => {
                self.push_log_entry(entry);
            }
            SessionEvent::Backfill {
                ticket,
                scope,
                result,
            } => {
                self.resolve_backfill(&scope, ticket, result);
            }
        }
    }

    /// Apply every event already queued, without waiting. Returns how many
    /// were applied.
    pub fn drain(&mut self, events: &mut EventReceiver) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Forget entities with no sample for `max_idle`.
    pub fn sweep_stale(&mut self, now: Instant, max_idle: Duration) -> Vec<EntityId> {
        let removed = self.metrics.sweep_stale(now, max_idle);
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "swept stale entities");
        }
        removed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogStream;

    fn entry(ts: i64, entity: &str) -> LogEntry {
        LogEntry::new(ts, entity, LogStream::Stdout, format!("line {ts}"))
    }

    fn web() -> LogScope {
        LogScope::Entity(EntityId::new("web"))
    }

    #[test]
    fn test_session_snapshot_unknown_entity() {
        let session = Session::default();
        assert!(session.snapshot(&EntityId::new("nope"), Metric::Cpu).is_empty());
    }

    #[test]
    fn test_session_push_sample_bounded() {
        let mut session = Session::new(SessionConfig {
            metric_history: 5,
            ..SessionConfig::default()
        });
        for v in [10.0, 20.0, 30.0, 40.0, 100.0, 7.0] {
            session.push_sample("web", Metric::Cpu, v);
        }
        assert_eq!(
            session.snapshot(&EntityId::new("web"), Metric::Cpu),
            vec![20.0, 30.0, 40.0, 100.0, 7.0]
        );
    }

    #[test]
    fn test_session_activation_issues_one_query() {
        let mut session = Session::default();
        let req = session.activate_logs(web()).expect("first activation");
        assert_eq!(req.limit, 500);
        assert!(session.activate_logs(web()).is_none());
        session.resolve_backfill(&web(), req.ticket, Ok(vec![]));
        assert!(session.activate_logs(web()).is_none());
    }

    #[test]
    fn test_session_reconciles_stream_and_backfill() {
        let mut session = Session::default();
        let req = session.activate_logs(web()).unwrap();
        session.push_log_entry(entry(100, "web"));
        session.push_log_entry(entry(101, "web"));
        session.resolve_backfill(&web(), req.ticket, Ok(vec![entry(100, "web"), entry(90, "web")]));
        let ts: Vec<_> = session
            .filtered_log_entries(&web(), &LogFilter::all())
            .iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(ts, vec![90, 100, 101]);
    }

    #[test]
    fn test_session_routes_to_group_and_single() {
        let mut session = Session::default();
        let group = LogScope::group(["web", "db"]);
        session.activate_logs(web());
        session.activate_logs(group.clone());
        assert_eq!(session.push_log_entry(entry(1, "web")), 2);
        assert_eq!(session.push_log_entry(entry(2, "db")), 1);
        assert_eq!(session.push_log_entry(entry(3, "cache")), 0);
        assert_eq!(session.filtered_log_entries(&group, &LogFilter::all()).len(), 2);
    }

    #[test]
    fn test_session_deactivate_rearms() {
        let mut session = Session::default();
        let first = session.activate_logs(web()).unwrap();
        session.resolve_backfill(&web(), first.ticket, Ok(vec![]));
        assert!(session.deactivate_logs(&web()));
        assert!(!session.deactivate_logs(&web()));
        let second = session.activate_logs(web()).expect("fresh view queries again");
        assert_ne!(first.ticket, second.ticket);
        // A late answer to the first query must not satisfy the second.
        assert_eq!(session.resolve_backfill(&web(), first.ticket, Ok(vec![entry(1, "web")])), None);
        assert!(!session.log_view(&web()).unwrap().is_backfilled());
    }

    #[test]
    fn test_session_closed_view_is_empty() {
        let session = Session::default();
        assert!(session.filtered_log_entries(&web(), &LogFilter::all()).is_empty());
    }

    #[test]
    fn test_session_scale_policy_limits() {
        let session = Session::new(SessionConfig {
            cpu_limit: Some(200.0),
            ..SessionConfig::default()
        });
        assert_eq!(session.scale_policy(Metric::Cpu), ScalePolicy::Limit(200.0));
        assert_eq!(session.scale_policy(Metric::Memory), ScalePolicy::Auto);
        assert_eq!(session.scale_policy(Metric::NetTx), ScalePolicy::Auto);
    }

    #[test]
    fn test_session_apply_and_drain() {
        let mut session = Session::default();
        let (tx, mut rx) = event_channel();
        tx.send(SessionEvent::Sample {
            entity: EntityId::host(),
            metric: Metric::Memory,
            value: 1024.0,
        })
        .unwrap();
        tx.send(SessionEvent::Log(entry(5, "web"))).unwrap();
        assert_eq!(session.drain(&mut rx), 2);
        assert_eq!(session.snapshot(&EntityId::host(), Metric::Memory), vec![1024.0]);
        assert_eq!(session.drain(&mut rx), 0);
    }

    #[test]
    fn test_session_sweep_stale() {
        let mut session = Session::default();
        let start = Instant::now();
        session.push_sample_at("gone", Metric::Cpu, 1.0, start);
        session.push_sample_at("alive", Metric::Cpu, 1.0, start + Duration::from_secs(100));
        let removed =
            session.sweep_stale(start + Duration::from_secs(120), Duration::from_secs(60));
        assert_eq!(removed, vec![EntityId::new("gone")]);
        assert!(session.snapshot(&EntityId::new("gone"), Metric::Cpu).is_empty());
    }

    struct FixedSource(Vec<LogEntry>);

    impl BackfillSource for FixedSource {
        fn fetch(
            &self,
            _request: BackfillRequest,
        ) -> impl Future<Output = Result<Vec<LogEntry>, BackfillError>> + Send {
            let entries = self.0.clone();
            async move { Ok(entries) }
        }
    }

    struct StalledSource;

    impl BackfillSource for StalledSource {
        fn fetch(
            &self,
            _request: BackfillRequest,
        ) -> impl Future<Output = Result<Vec<LogEntry>, BackfillError>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn test_spawn_backfill_posts_result() {
        let mut session = Session::default();
        let (tx, mut rx) = event_channel();
        let req = session.activate_logs(web()).unwrap();
        let source = Arc::new(FixedSource(vec![entry(3, "web"), entry(1, "web")]));
        spawn_backfill(source, req, Duration::from_secs(1), tx)
            .await
            .unwrap();
        assert_eq!(session.drain(&mut rx), 1);
        let view = session.log_view(&web()).unwrap();
        assert!(view.is_backfilled());
        assert_eq!(view.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_backfill_timeout_degrades() {
        let mut session = Session::default();
        let (tx, mut rx) = event_channel();
        let req = session.activate_logs(web()).unwrap();
        session.push_log_entry(entry(10, "web"));
        spawn_backfill(Arc::new(StalledSource), req, Duration::from_secs(5), tx)
            .await
            .unwrap();
        let event = rx.try_recv().unwrap();
        assert!(matches!(
            &event,
            SessionEvent::Backfill { result: Err(BackfillError::TimedOut(_)), .. }
        ));
        session.apply(event);
        let view = session.log_view(&web()).unwrap();
        assert!(view.is_backfilled());
        assert_eq!(view.len(), 1);
        assert!(session.activate_logs(web()).is_none());
    }

    struct PanickingSource;

    impl BackfillSource for PanickingSource {
        fn fetch(
            &self,
            _request: BackfillRequest,
        ) -> impl Future<Output = Result<Vec<LogEntry>, BackfillError>> + Send {
            async { panic!("transport blew up") }
        }
    }

    #[tokio::test]
    async fn test_spawn_backfill_panic_degrades() {
        let mut session = Session::default();
        let (tx, mut rx) = event_channel();
        let req = session.activate_logs(web()).unwrap();
        session.push_log_entry(entry(10, "web"));
        let handle = spawn_backfill(Arc::new(PanickingSource), req, Duration::from_secs(5), tx);
        assert!(handle.await.unwrap_err().is_panic());

        let event = rx.try_recv().unwrap();
        assert!(matches!(
            &event,
            SessionEvent::Backfill { result: Err(BackfillError::Aborted), .. }
        ));
        session.apply(event);
        let view = session.log_view(&web()).unwrap();
        assert!(view.is_backfilled());
        assert_eq!(view.len(), 1);
        assert!(session.activate_logs(web()).is_none());
    }

    #[tokio::test]
    async fn test_spawn_backfill_abort_degrades() {
        let mut session = Session::default();
        let (tx, mut rx) = event_channel();
        let req = session.activate_logs(web()).unwrap();
        let handle = spawn_backfill(Arc::new(StalledSource), req, Duration::from_secs(60), tx);
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        assert_eq!(session.drain(&mut rx), 1);
        assert!(session.log_view(&web()).unwrap().is_backfilled());
        assert!(rx.try_recv().is_err());
    }
}
