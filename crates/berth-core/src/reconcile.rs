//! Stream/backfill reconciliation for log views.
//!
//! A view receives log lines from two sources: the live stream, which starts
//! delivering as soon as the view is active, and a single historical query
//! issued on activation. Streamed lines are retained immediately. When the
//! historical query resolves, every line strictly older than the oldest
//! streamed timestamp (the watermark) is merged in front of the streamed tail
//! in ascending timestamp order, and the rebuilt buffer replaces the old one.
//!
//! The watermark is the only deduplication mechanism. Historical lines that
//! share the watermark second are dropped: the stream owns that second.

use crate::error::BackfillError;
use crate::log::{LogEntry, LogFilter, LogScope};
use crate::ring_buffer::RingBuffer;
use std::time::Duration;

/// Identifies one issued historical query so late answers can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackfillTicket(pub u64);

/// Historical query a view wants the transport to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillRequest {
    pub ticket: BackfillTicket,
    pub scope: LogScope,
    /// How far back to look.
    pub window: Duration,
    /// Maximum number of entries to return.
    pub limit: usize,
}

impl BackfillRequest {
    /// Entity ids to query.
    #[must_use]
    pub fn entities(&self) -> Vec<crate::entity::EntityId> {
        self.scope.entities()
    }
}

/// Backfill lifecycle of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackfillState {
    /// No query issued yet.
    #[default]
    Idle,
    /// Query in flight.
    Pending(BackfillTicket),
    /// Query resolved (successfully or not); never re-issued.
    Done,
}

/// One reconciled, bounded, chronologically ordered log view.
#[derive(Debug, Clone)]
pub struct LogSeries {
    scope: LogScope,
    entries: RingBuffer<LogEntry>,
    /// Oldest timestamp seen from the live stream.
    watermark: Option<i64>,
    state: BackfillState,
    window: Duration,
    limit: usize,
}

impl LogSeries {
    /// Create an empty view retaining at most `capacity` entries.
    #[must_use]
    pub fn new(scope: LogScope, capacity: usize, window: Duration, limit: usize) -> Self {
        Self {
            scope,
            entries: RingBuffer::new(capacity),
            watermark: None,
            state: BackfillState::Idle,
            window,
            limit,
        }
    }

    #[must_use]
    pub fn scope(&self) -> &LogScope {
        &self.scope
    }

    #[must_use]
    pub fn state(&self) -> BackfillState {
        self.state
    }

    /// True once the historical query has resolved.
    #[must_use]
    pub fn is_backfilled(&self) -> bool {
        self.state == BackfillState::Done
    }

    #[must_use]
    pub fn watermark(&self) -> Option<i64> {
        self.watermark
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Activate the view.
    ///
    /// Returns the historical query to run the first time only; while a query
    /// is in flight or after it resolved, activation issues nothing.
    pub fn activate(&mut self, ticket: BackfillTicket) -> Option<BackfillRequest> {
        if self.state != BackfillState::Idle {
            return None;
        }
        self.state = BackfillState::Pending(ticket);
        tracing::debug!(scope = ?self.scope, ticket = ticket.0, "backfill issued");
        Some(BackfillRequest {
            ticket,
            scope: self.scope.clone(),
            window: self.window,
            limit: self.limit,
        })
    }

    /// Append a streamed entry. Returns false when the entry is out of scope.
    pub fn push(&mut self, entry: LogEntry) -> bool {
        if !self.scope.contains(&entry.entity) {
            return false;
        }
        self.watermark = Some(
            self.watermark
                .map_or(entry.timestamp, |w| w.min(entry.timestamp)),
        );
        self.entries.push(entry);
        true
    }

    /// Merge the answer of the historical query.
    ///
    /// Transport failures count as an empty answer. Answers for a ticket
    /// this view is not waiting on are ignored and return `None`; otherwise
    /// the number of merged historical entries is returned.
    pub fn resolve_backfill(
        &mut self,
        ticket: BackfillTicket,
        result: Result<Vec<LogEntry>, BackfillError>,
    ) -> Option<usize> {
        if self.state != BackfillState::Pending(ticket) {
            tracing::debug!(ticket = ticket.0, "ignoring stale backfill answer");
            return None;
        }
        self.state = BackfillState::Done;

        let history = match result {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(
                    scope = ?self.scope,
                    error = %err,
                    "backfill failed, streaming only"
                );
                Vec::new()
            }
        };

        let watermark = self.watermark;
        let mut accepted: Vec<LogEntry> = history
            .into_iter()
            .filter(|e| self.scope.contains(&e.entity))
            .filter(|e| watermark.map_or(true, |w| e.timestamp < w))
            .collect();

        // Newest-first answers are flipped before the stable sort so that
        // same-second entries keep their original relative order.
        if is_newest_first(&accepted) {
            accepted.reverse();
        }
        accepted.sort_by_key(|e| e.timestamp);
        if accepted.len() > self.limit {
            accepted.drain(..accepted.len() - self.limit);
        }

        let merged = accepted.len();
        let mut rebuilt = RingBuffer::new(self.entries.capacity());
        rebuilt.extend(accepted);
        rebuilt.extend(self.entries.iter().cloned());
        self.entries = rebuilt;

        tracing::debug!(
            scope = ?self.scope,
            merged,
            retained = self.entries.len(),
            "backfill merged"
        );
        Some(merged)
    }

    /// Forget all history and re-arm the historical query.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.watermark = None;
        self.state = BackfillState::Idle;
    }

    /// Oldest-first copy of the retained entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.data()
    }

    /// Oldest-first copy of the entries matching `filter`.
    #[must_use]
    pub fn filtered(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// Newest retained entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

/// Non-increasing timestamps with at least one strict drop. Unordered and
/// all-equal answers are left as delivered.
fn is_newest_first(entries: &[LogEntry]) -> bool {
    let descending = entries.windows(2).all(|w| w[0].timestamp >= w[1].timestamp);
    match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => descending && first.timestamp > last.timestamp,
        _ => false,
    }
}
