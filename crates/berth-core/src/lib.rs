//! Bounded metric and log retention for the berth container dashboard.
//!
//! This crate owns everything the dashboard remembers between frames:
//! - Fixed-capacity history: [`RingBuffer`], [`MetricRegistry`]
//! - Series shaping: [`fit_to_width`], [`aggregate_history`]
//! - Graph ceilings: [`ScalePolicy`], [`nice_ceiling`]
//! - Log views with stream/backfill reconciliation: [`LogSeries`]
//! - The single-owner update path: [`Session`], [`SessionEvent`]
//! - Ambient setup: [`SessionConfig`], [`init_logging`]
//!
//! Rendering lives in `berth-terminal`; nothing here draws.

mod config;
mod entity;
mod error;
mod history;
mod log;
mod logging;
mod reconcile;
mod ring_buffer;
mod scale;
mod series;
mod session;

pub use config::{BackfillConfig, SessionConfig};
pub use entity::{EntityId, Metric};
pub use error::{BackfillError, ConfigError};
pub use history::MetricRegistry;
pub use log::{LogEntry, LogFilter, LogScope, LogStream};
pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use reconcile::{BackfillRequest, BackfillState, BackfillTicket, LogSeries};
pub use ring_buffer::RingBuffer;
pub use scale::{nice_ceiling, ScalePolicy};
pub use series::{aggregate_history, fit_to_width};
pub use session::{
    event_channel, spawn_backfill, BackfillSource, EventReceiver, EventSender, Session,
    SessionEvent,
};
