//! Core identifier and configuration types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of ids shared by handlers and events. Ids are never reused.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Stable identity of a handler.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub u64);

impl fmt::Debug for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerId({})", self.0)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Stable identity of an event.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u64);

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Configuration for a channel subscription.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Max buffered payloads before new ones are rejected (None = unbounded).
    /// Default: 1000
    pub buffer_size: Option<usize>,
}

impl ChannelConfig {
    /// Buffer at most `size` payloads.
    pub fn bounded(size: usize) -> Self {
        Self {
            buffer_size: Some(size),
        }
    }

    /// Never reject a payload.
    pub fn unbounded() -> Self {
        Self { buffer_size: None }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::bounded(1000)
    }
}
