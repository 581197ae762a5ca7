//! Per-entity numeric history.
//!
//! Entities are created lazily on their first sample and live until the
//! session ends or a stale sweep removes them.

use crate::entity::{EntityId, Metric};
use crate::ring_buffer::RingBuffer;
use crate::series::aggregate_history;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct EntityHistory {
    series: HashMap<Metric, RingBuffer<f64>>,
    last_seen: Instant,
}

/// Registry of `(entity, metric)` ring buffers.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    capacity: usize,
    entities: HashMap<EntityId, EntityHistory>,
}

impl MetricRegistry {
    /// Create an empty registry whose buffers hold `capacity` samples each.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entities: HashMap::new(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record one sample observed at `now`.
    pub fn push(&mut self, entity: EntityId, metric: Metric, value: f64, now: Instant) {
        let capacity = self.capacity;
        let history = self.entities.entry(entity).or_insert_with_key(|id| {
            tracing::trace!(entity = %id, "tracking new entity");
            EntityHistory {
                series: HashMap::new(),
                last_seen: now,
            }
        });
        history.last_seen = now;
        history
            .series
            .entry(metric)
            .or_insert_with(|| RingBuffer::new(capacity))
            .push(value);
    }

    /// Oldest-first samples; empty for unknown entities or metrics.
    #[must_use]
    pub fn snapshot(&self, entity: &EntityId, metric: Metric) -> Vec<f64> {
        self.buffer(entity, metric)
            .map(RingBuffer::data)
            .unwrap_or_default()
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self, entity: &EntityId, metric: Metric) -> Option<f64> {
        self.buffer(entity, metric).and_then(|b| b.last().copied())
    }

    /// Right-aligned sum of `metric` across `entities`. Unknown entities
    /// contribute nothing.
    pub fn aggregate<'a, I>(&self, metric: Metric, entities: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        aggregate_history(
            entities
                .into_iter()
                .map(|id| self.snapshot(id, metric)),
        )
    }

    /// Tracked entity ids in sorted order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().cloned().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn contains(&self, entity: &EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop entities with no sample in the last `max_idle`. Returns the
    /// removed ids, sorted.
    pub fn sweep_stale(&mut self, now: Instant, max_idle: Duration) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.entities.retain(|id, history| {
            let idle = now.saturating_duration_since(history.last_seen);
            let keep = idle <= max_idle;
            if !keep {
                removed.push(id.clone());
            }
            keep
        });
        removed.sort();
        removed
    }

    fn buffer(&self, entity: &EntityId, metric: Metric) -> Option<&RingBuffer<f64>> {
        self.entities.get(entity)?.series.get(&metric)
    }
}
