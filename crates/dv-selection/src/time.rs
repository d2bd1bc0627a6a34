//! Timestamps and spans on the trace timeline

use serde::{Deserialize, Serialize};

/// A point on the timeline, in trace duration units
pub type Time = i64;

/// A length of time, in trace duration units
///
/// `-1` is reserved for events that never finished.
pub type Duration = i64;

/// Duration value marking an event that has no recorded end
pub const INCOMPLETE_DURATION: Duration = -1;

/// A half-open `[start, end)` range of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    /// Sentinel timestamp used by [`TimeSpan::INVALID`]
    pub const INVALID_TIME: Time = i64::MIN;

    /// Span whose bounds are both [`TimeSpan::INVALID_TIME`]
    pub const INVALID: TimeSpan = TimeSpan {
        start: Self::INVALID_TIME,
        end: Self::INVALID_TIME,
    };

    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Build the span starting at `start` and lasting `duration`
    pub fn from_time_and_duration(start: Time, duration: Duration) -> Self {
        Self {
            start,
            end: start.saturating_add(duration),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }

    pub fn is_valid(&self) -> bool {
        self.start != Self::INVALID_TIME && self.end != Self::INVALID_TIME
    }
}
