//! Selection shapes kept for the single-detail lookup path

use serde::{Deserialize, Serialize};

use super::EventId;
use crate::time::{Duration, Time};

/// Which details panel renders a generic slice, plus its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsPanelConfig {
    pub kind: String,
    pub config: serde_json::Value,
}

/// A slice from an arbitrary SQL table, carrying its own bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericSliceSelection {
    pub id: EventId,
    pub sql_table_name: String,
    pub start: Time,
    pub duration: Duration,
    pub track_uri: String,
    pub details_panel: DetailsPanelConfig,
}

/// Historical selection shapes, each resolved through the details backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LegacySelection {
    Slice {
        id: EventId,
        track_uri: Option<String>,
    },
    SchedSlice {
        id: EventId,
        track_uri: Option<String>,
    },
    ThreadState {
        id: EventId,
        track_uri: Option<String>,
    },
    Log {
        id: EventId,
        track_uri: Option<String>,
    },
    GenericSlice(GenericSliceSelection),
}

impl LegacySelection {
    pub fn id(&self) -> EventId {
        match self {
            LegacySelection::Slice { id, .. }
            | LegacySelection::SchedSlice { id, .. }
            | LegacySelection::ThreadState { id, .. }
            | LegacySelection::Log { id, .. } => *id,
            LegacySelection::GenericSlice(slice) => slice.id,
        }
    }

    /// Track the selected object lives on, if known
    pub fn track_uri(&self) -> Option<&str> {
        match self {
            LegacySelection::Slice { track_uri, .. }
            | LegacySelection::SchedSlice { track_uri, .. }
            | LegacySelection::ThreadState { track_uri, .. }
            | LegacySelection::Log { track_uri, .. } => track_uri.as_deref(),
            LegacySelection::GenericSlice(slice) => Some(slice.track_uri.as_str()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LegacySelection::Slice { .. } => "SLICE",
            LegacySelection::SchedSlice { .. } => "SCHED_SLICE",
            LegacySelection::ThreadState { .. } => "THREAD_STATE",
            LegacySelection::Log { .. } => "LOG",
            LegacySelection::GenericSlice(_) => "GENERIC_SLICE",
        }
    }
}

/// Rich data queried for a legacy selection
///
/// A missing `ts` or `dur` means the bounds are unknown, which is not the
/// same thing as a zero-length event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDetails {
    pub ts: Option<Time>,
    pub dur: Option<Duration>,
    /// Used to draw the wakeup arrow for scheduling slices
    pub wakeup_ts: Option<Time>,
    pub waker_cpu: Option<u32>,
}
