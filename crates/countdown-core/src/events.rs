use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DurationSelection, TimerState};

/// Every state change in the engine produces an Event.
/// The presentation layer re-renders on them; listeners subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        completes_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        completes_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    /// The countdown ran out, or a zero duration was started.
    TimerCompleted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCancelled {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SelectionChanged {
        selection: DurationSelection,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        selection: DurationSelection,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        completes_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends a countdown run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::TimerCompleted { .. } | Event::TimerCancelled { .. }
        )
    }
}
