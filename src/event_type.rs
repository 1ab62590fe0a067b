//! Canonical Go runtime event types tracked by xgotop
//!
//! The numeric ids match the ones the tracer writes into the `event_counts`
//! map of its metrics documents. `EventType::ALL` is the single ordered list
//! both the extractor and the validator iterate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Go runtime event kind observed through a uprobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// `runtime.casgstatus` (goroutine state transition)
    Casgstatus,
    /// `runtime.makeslice`
    Makeslice,
    /// `runtime.makemap`
    Makemap,
    /// `runtime.newobject`
    Newobject,
    /// `runtime.newproc1` (goroutine creation)
    Newgoroutine,
    /// `runtime.goexit1` (goroutine exit)
    Goexit,
}

impl EventType {
    /// Every canonical type, in report order
    pub const ALL: [EventType; 6] = [
        EventType::Casgstatus,
        EventType::Makeslice,
        EventType::Makemap,
        EventType::Newobject,
        EventType::Newgoroutine,
        EventType::Goexit,
    ];

    /// Resolve a tracer event id (0-5)
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(id).ok()?).copied()
    }

    /// Tracer event id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Position in `ALL`
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Canonical name used in rate specs and reports
    pub fn name(self) -> &'static str {
        match self {
            EventType::Casgstatus => "casgstatus",
            EventType::Makeslice => "makeslice",
            EventType::Makemap => "makemap",
            EventType::Newobject => "newobject",
            EventType::Newgoroutine => "newgoroutine",
            EventType::Goexit => "goexit",
        }
    }

    /// Resolve a canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name is not one of the canonical event types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| UnknownEventType(s.to_string()))
    }
}
