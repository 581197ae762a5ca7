//! Monitored entities and the numeric metrics tracked per entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a monitored entity: a container id or the host itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Reserved id under which host-level samples are filed.
    pub const HOST: &'static str = "__host__";

    /// Wrap a container id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The host entity.
    #[must_use]
    pub fn host() -> Self {
        Self(Self::HOST.to_string())
    }

    /// Whether this id names the host rather than a container.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.0 == Self::HOST
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host() {
            f.write_str("host")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Numeric series retained per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// CPU usage in percent of one core.
    Cpu,
    /// Resident memory in bytes.
    Memory,
    /// Network receive rate in bytes/s.
    NetRx,
    /// Network transmit rate in bytes/s.
    NetTx,
    /// Block device read rate in bytes/s.
    BlockRead,
    /// Block device write rate in bytes/s.
    BlockWrite,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Self; 6] = [
        Self::Cpu,
        Self::Memory,
        Self::NetRx,
        Self::NetTx,
        Self::BlockRead,
        Self::BlockWrite,
    ];

    /// Short label for panel titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "MEM",
            Self::NetRx => "RX",
            Self::NetTx => "TX",
            Self::BlockRead => "READ",
            Self::BlockWrite => "WRITE",
        }
    }
}
