//! Log lines as delivered by the agent, and the views that select them.

use crate::entity::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which output a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStream {
    Stdout,
    Stderr,
    /// Synthetic lifecycle line emitted by the agent (start, stop, oom...).
    Event,
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub entity: EntityId,
    pub stream: LogStream,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(
        timestamp: i64,
        entity: impl Into<EntityId>,
        stream: LogStream,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            entity: entity.into(),
            stream,
            message: message.into(),
        }
    }
}

/// The set of entities a log view follows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogScope {
    /// A single container (or the host).
    Entity(EntityId),
    /// Merged view over several entities.
    Group(BTreeSet<EntityId>),
}

impl LogScope {
    /// Build a group scope from any id collection.
    pub fn group<I, E>(ids: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EntityId>,
    {
        Self::Group(ids.into_iter().map(Into::into).collect())
    }

    /// Whether entries from `entity` belong to this view.
    #[must_use]
    pub fn contains(&self, entity: &EntityId) -> bool {
        match self {
            Self::Entity(id) => id == entity,
            Self::Group(ids) => ids.contains(entity),
        }
    }

    /// Ids covered by the scope, in sorted order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        match self {
            Self::Entity(id) => vec![id.clone()],
            Self::Group(ids) => ids.iter().cloned().collect(),
        }
    }
}

impl From<EntityId> for LogScope {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

/// Reader-side filter applied to a retained log view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Allowed streams; empty means all.
    pub streams: BTreeSet<LogStream>,
    /// Case-insensitive substring the message must contain.
    pub contains: Option<String>,
    /// Entries older than this timestamp are skipped.
    pub since: Option<i64>,
}

impl LogFilter {
    /// Filter that accepts everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one stream (may be called repeatedly).
    #[must_use]
    pub fn with_stream(mut self, stream: LogStream) -> Self {
        self.streams.insert(stream);
        self
    }

    /// Require a substring match.
    #[must_use]
    pub fn with_text(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into().to_lowercase());
        self
    }

    /// Skip entries before `timestamp`.
    #[must_use]
    pub fn since(mut self, timestamp: i64) -> Self {
        self.since = Some(timestamp);
        self
    }

    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if !self.streams.is_empty() && !self.streams.contains(&entry.stream) {
            return false;
        }
        if self.since.is_some_and(|since| entry.timestamp < since) {
            return false;
        }
        match &self.contains {
            Some(needle) => entry.message.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}
