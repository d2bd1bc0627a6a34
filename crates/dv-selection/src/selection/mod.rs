//! Selection locators: lightweight values saying "what is selected"
//!
//! A [`Selection`] never carries queried data. The details backing a
//! selection are resolved asynchronously by the
//! [`SelectionManager`](crate::SelectionManager).

use serde::{Deserialize, Serialize};

use crate::time::{Time, TimeSpan};
use crate::SelectionError;

mod legacy;

pub use legacy::{DetailsPanelConfig, GenericSliceSelection, LegacySelection, ResolvedDetails};

/// Identifier of an event within its track
pub type EventId = i64;

/// Metadata for a track, looked up from the track catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub uri: String,
    pub title: String,
    /// Kind of data drawn on the track (e.g. "slice", "counter")
    pub kind: Option<String>,
}

/// A closed time interval over a set of tracks
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    start: Time,
    end: Time,
    track_uris: Vec<String>,
}

impl Area {
    /// Create an area, rejecting `start > end`
    pub fn new(start: Time, end: Time, track_uris: Vec<String>) -> Result<Self, SelectionError> {
        if start > end {
            return Err(SelectionError::InvalidArea { start, end });
        }
        Ok(Self {
            start,
            end,
            track_uris,
        })
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn end(&self) -> Time {
        self.end
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }

    pub fn track_uris(&self) -> &[String] {
        &self.track_uris
    }

    /// Add `uri` if absent, remove it if present
    pub fn toggle_track(&mut self, uri: &str) {
        if let Some(pos) = self.track_uris.iter().position(|t| t == uri) {
            self.track_uris.remove(pos);
        } else {
            self.track_uris.push(uri.to_string());
        }
    }

    /// Remove every uri in `uris` if all are present, else add the missing ones
    pub fn toggle_track_group(&mut self, uris: &[String]) {
        let all_selected = uris.iter().all(|u| self.track_uris.contains(u));

        if all_selected {
            self.track_uris.retain(|t| !uris.contains(t));
        } else {
            for uri in uris {
                if !self.track_uris.contains(uri) {
                    self.track_uris.push(uri.clone());
                }
            }
        }
    }
}

/// An area plus the descriptors of the tracks that resolved
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSelection {
    pub area: Area,
    /// Filled in when the selection is installed; unknown uris are dropped
    pub tracks: Vec<TrackDescriptor>,
}

impl AreaSelection {
    pub fn new(area: Area) -> Self {
        Self {
            area,
            tracks: Vec::new(),
        }
    }
}

/// What is currently selected
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    Empty,
    /// One event on one track
    Single { track_uri: String, event_id: EventId },
    Area(AreaSelection),
    Note { id: String },
    Legacy(LegacySelection),
    /// Several heterogeneous selections, in order
    Union(Vec<Selection>),
}

impl Selection {
    pub fn kind(&self) -> &'static str {
        match self {
            Selection::Empty => "empty",
            Selection::Single { .. } => "single",
            Selection::Area(_) => "area",
            Selection::Note { .. } => "note",
            Selection::Legacy(_) => "legacy",
            Selection::Union(_) => "union",
        }
    }

    /// The legacy-compatible view of this selection
    ///
    /// Only `Legacy` selections have one. A `Union` yields the view of its
    /// first child that has one.
    pub fn to_legacy(&self) -> Option<&LegacySelection> {
        match self {
            Selection::Empty
            | Selection::Single { .. }
            | Selection::Area(_)
            | Selection::Note { .. } => None,
            Selection::Legacy(legacy) => Some(legacy),
            Selection::Union(children) => children.iter().find_map(Selection::to_legacy),
        }
    }

    pub fn as_area(&self) -> Option<&AreaSelection> {
        match self {
            Selection::Area(area) => Some(area),
            _ => None,
        }
    }
}

/// Flags that travel with a selection change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOpts {
    /// Whether an active search should be cleared
    pub clear_search: bool,
    /// Scroll to the selection once details for this event id are resolved
    pub pending_scroll_id: Option<EventId>,
    /// Whether the "current selection" details tab should be brought forward
    pub switch_to_current_selection_tab: bool,
}

impl Default for SelectionOpts {
    fn default() -> Self {
        Self {
            clear_search: true,
            pending_scroll_id: None,
            switch_to_current_selection_tab: true,
        }
    }
}
