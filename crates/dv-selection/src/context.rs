//! Collaborators the selection manager talks to
//!
//! Everything here is supplied by the host application. The manager never
//! renders, queries, or scrolls on its own; it only decides *when* these
//! collaborators get called.

use std::sync::Arc;

use crate::notes::Note;
use crate::selection::{
    EventId, LegacySelection, ResolvedDetails, Selection, SelectionOpts, TrackDescriptor,
};
use crate::time::{Duration, Time, TimeSpan};

/// Start and length of an event on a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBounds {
    pub ts: Time,
    pub dur: Duration,
}

/// Catalog of the tracks currently loaded
#[async_trait::async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Look up a track descriptor by uri
    fn get_track(&self, uri: &str) -> Option<TrackDescriptor>;

    /// Bounds of `event_id` on the track `uri`, if the track can tell
    async fn event_bounds(&self, uri: &str, event_id: EventId) -> Option<EventBounds>;
}

/// Read access to user annotations
pub trait NoteStore: Send + Sync {
    fn get_note(&self, id: &str) -> Option<Note>;
}

/// Track to bring into view when scrolling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackScroll {
    pub uri: String,
    pub expand_group: bool,
}

/// Where the viewport should move
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollRequest {
    pub time: Option<TimeSpan>,
    pub track: Option<TrackScroll>,
}

/// Moves the viewport
pub trait ScrollHelper: Send + Sync {
    fn scroll_to(&self, request: ScrollRequest);
}

/// Fire-and-forget redraw requests, coalesced by the implementor
pub trait RedrawScheduler: Send + Sync {
    fn schedule_full_redraw(&self);
}

/// Answers detail queries for legacy selections
#[async_trait::async_trait]
pub trait DetailsBackend: Send + Sync {
    /// `Ok(None)` means nothing was found for the selection
    async fn resolve_legacy_selection(
        &self,
        selection: &LegacySelection,
    ) -> anyhow::Result<Option<ResolvedDetails>>;
}

/// Trait for components that need to respond to selection changes
pub trait SelectionListener: Send + Sync {
    /// Called synchronously on every selection change
    fn on_selection_change(&self, selection: &Selection, opts: &SelectionOpts);
}

impl<F> SelectionListener for F
where
    F: Fn(&Selection, &SelectionOpts) + Send + Sync,
{
    fn on_selection_change(&self, selection: &Selection, opts: &SelectionOpts) {
        self(selection, opts)
    }
}

/// Handles to every collaborator, passed to the manager at construction
#[derive(Clone)]
pub struct SelectionContext {
    pub tracks: Arc<dyn TrackCatalog>,
    pub notes: Arc<dyn NoteStore>,
    pub scroll: Arc<dyn ScrollHelper>,
    pub redraw: Arc<dyn RedrawScheduler>,
    pub backend: Arc<dyn DetailsBackend>,

    /// Runtime the manager spawns its background work on
    pub runtime_handle: tokio::runtime::Handle,
}
