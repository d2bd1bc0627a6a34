//! In-memory collaborators
//!
//! Useful for demos, tests, and hosts that keep their track catalog and
//! detail data resident.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};

use crate::context::{
    DetailsBackend, EventBounds, RedrawScheduler, ScrollHelper, ScrollRequest, TrackCatalog,
};
use crate::selection::{EventId, LegacySelection, ResolvedDetails, TrackDescriptor};

#[derive(Debug, Clone)]
struct StoredBounds {
    bounds: EventBounds,
    latency: Duration,
}

/// Track catalog backed by hash maps
#[derive(Debug, Default)]
pub struct TrackRegistry {
    tracks: RwLock<AHashMap<String, TrackDescriptor>>,
    bounds: RwLock<AHashMap<(String, EventId), StoredBounds>>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track(&self, uri: impl Into<String>, title: impl Into<String>) {
        let uri = uri.into();
        self.tracks.write().insert(
            uri.clone(),
            TrackDescriptor {
                uri,
                title: title.into(),
                kind: None,
            },
        );
    }

    pub fn insert_track(&self, descriptor: TrackDescriptor) {
        self.tracks.write().insert(descriptor.uri.clone(), descriptor);
    }

    pub fn set_event_bounds(&self, uri: impl Into<String>, event_id: EventId, bounds: EventBounds) {
        self.set_event_bounds_with_latency(uri, event_id, bounds, Duration::ZERO);
    }

    /// Like [`set_event_bounds`](Self::set_event_bounds), but the lookup waits `latency`
    pub fn set_event_bounds_with_latency(
        &self,
        uri: impl Into<String>,
        event_id: EventId,
        bounds: EventBounds,
        latency: Duration,
    ) {
        self.bounds
            .write()
            .insert((uri.into(), event_id), StoredBounds { bounds, latency });
    }
}

#[async_trait::async_trait]
impl TrackCatalog for TrackRegistry {
    fn get_track(&self, uri: &str) -> Option<TrackDescriptor> {
        self.tracks.read().get(uri).cloned()
    }

    async fn event_bounds(&self, uri: &str, event_id: EventId) -> Option<EventBounds> {
        let stored = self.bounds.read().get(&(uri.to_string(), event_id)).cloned()?;
        if !stored.latency.is_zero() {
            tokio::time::sleep(stored.latency).await;
        }
        Some(stored.bounds)
    }
}

#[derive(Debug, Clone)]
enum DetailsEntry {
    Found {
        details: ResolvedDetails,
        latency: Duration,
    },
    Failing,
}

/// Details backend answering from a table keyed by event id
#[derive(Debug, Default)]
pub struct StaticDetailsBackend {
    entries: RwLock<AHashMap<EventId, DetailsEntry>>,
    calls: AtomicUsize,
}

impl StaticDetailsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: EventId, details: ResolvedDetails) {
        self.insert_with_latency(id, details, Duration::ZERO);
    }

    pub fn insert_with_latency(&self, id: EventId, details: ResolvedDetails, latency: Duration) {
        self.entries
            .write()
            .insert(id, DetailsEntry::Found { details, latency });
    }

    /// Make lookups of `id` return an error
    pub fn fail(&self, id: EventId) {
        self.entries.write().insert(id, DetailsEntry::Failing);
    }

    /// Number of queries received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DetailsBackend for StaticDetailsBackend {
    async fn resolve_legacy_selection(
        &self,
        selection: &LegacySelection,
    ) -> anyhow::Result<Option<ResolvedDetails>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let entry = self.entries.read().get(&selection.id()).cloned();
        match entry {
            None => Ok(None),
            Some(DetailsEntry::Failing) => {
                anyhow::bail!(
                    "no backend available for {} {}",
                    selection.kind_name(),
                    selection.id()
                )
            }
            Some(DetailsEntry::Found { details, latency }) => {
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                Ok(Some(details))
            }
        }
    }
}

/// Scroll helper that remembers every request
#[derive(Debug, Default)]
pub struct RecordingScroll {
    requests: Mutex<Vec<ScrollRequest>>,
}

impl RecordingScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ScrollRequest> {
        self.requests.lock().clone()
    }
}

impl ScrollHelper for RecordingScroll {
    fn scroll_to(&self, request: ScrollRequest) {
        tracing::debug!(?request, "scroll requested");
        self.requests.lock().push(request);
    }
}

/// Redraw scheduler that only counts requests
#[derive(Debug, Default)]
pub struct RedrawCounter {
    count: AtomicUsize,
}

impl RedrawCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl RedrawScheduler for RedrawCounter {
    fn schedule_full_redraw(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
