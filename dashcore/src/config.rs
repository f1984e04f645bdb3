//! Runtime configuration.
//!
//! Every limit is a validated newtype, so a [`DashboardConfig`] that exists
//! is within range. Deserialization runs the same validation.

use crate::errors::ConfigError;
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Maximum number of undo entries kept in the history.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 1000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct UndoHistoryLimit(usize);

impl Default for UndoHistoryLimit {
    fn default() -> Self {
        Self::try_new(50).expect("50 is always a valid undo history limit")
    }
}

/// Capacity of the dispatcher's command queue.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 10_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct CommandQueueCapacity(usize);

impl Default for CommandQueueCapacity {
    fn default() -> Self {
        Self::try_new(64).expect("64 is always a valid command queue capacity")
    }
}

/// Capacity of the dispatcher's event broadcast channel.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 65_536),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct EventChannelCapacity(usize);

impl Default for EventChannelCapacity {
    fn default() -> Self {
        Self::try_new(256).expect("256 is always a valid event channel capacity")
    }
}

/// Configuration shared by the runtime and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Undo entries kept before the oldest is dropped.
    pub undo_history_limit: UndoHistoryLimit,
    /// Commands buffered by the dispatcher before `dispatch` waits.
    pub command_queue_capacity: CommandQueueCapacity,
    /// Events buffered per subscriber before it starts lagging.
    pub event_channel_capacity: EventChannelCapacity,
}

impl DashboardConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the undo history limit.
    #[must_use]
    pub fn with_undo_history_limit(mut self, limit: UndoHistoryLimit) -> Self {
        self.undo_history_limit = limit;
        self
    }

    /// Sets the command queue capacity.
    #[must_use]
    pub fn with_command_queue_capacity(mut self, capacity: CommandQueueCapacity) -> Self {
        self.command_queue_capacity = capacity;
        self
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: EventChannelCapacity) -> Self {
        self.event_channel_capacity = capacity;
        self
    }
}
