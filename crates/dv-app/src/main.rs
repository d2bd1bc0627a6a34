//! Scripted walkthrough of the selection manager
//!
//! Wires the manager to in-memory collaborators and plays a short sequence
//! of selections, logging what a details panel would show at each step.
//! Pass a JSON file as the first argument to override `SelectionConfig`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dv_selection::memory::{RecordingScroll, RedrawCounter, StaticDetailsBackend, TrackRegistry};
use dv_selection::notes::{NoteManager, NoteType};
use dv_selection::{
    AreaAggregator, AreaSelection, AreaSummary, EventBounds, LegacySelection, ResolvedDetails,
    SearchResult, SearchSource, Selection, SelectionConfig, SelectionContext, SelectionManager,
    SelectionOpts,
};

/// Counts the tracks of an area that resolved to a descriptor
struct TrackCountAggregator;

#[async_trait::async_trait]
impl AreaAggregator for TrackCountAggregator {
    fn id(&self) -> &str {
        "track_count"
    }

    async fn compute(&self, area: &AreaSelection) -> Option<AreaSummary> {
        Some(AreaSummary {
            columns: vec!["requested".to_string(), "resolved".to_string()],
            rows: vec![vec![
                serde_json::json!(area.area.track_uris().len()),
                serde_json::json!(area.tracks.len()),
            ]],
        })
    }
}

fn load_config() -> Result<SelectionConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {path}"))?;
            Ok(SelectionConfig::from_json(&json)?)
        }
        None => Ok(SelectionConfig::default()),
    }
}

fn slice_details(ts: i64, dur: i64) -> ResolvedDetails {
    ResolvedDetails {
        ts: Some(ts),
        dur: Some(dur),
        ..Default::default()
    }
}

fn report(manager: &SelectionManager, step: &str) {
    info!(
        step,
        kind = manager.selection().kind(),
        generation = manager.generation(),
        details = ?manager.selection_details(),
        "state"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;

    let tracks = Arc::new(TrackRegistry::new());
    for cpu in 0..4 {
        tracks.add_track(format!("/cpu{cpu}"), format!("CPU {cpu}"));
    }
    tracks.set_event_bounds("/cpu1", 11, EventBounds { ts: 4_000, dur: 250 });

    let backend = Arc::new(StaticDetailsBackend::new());
    backend.insert(1, slice_details(1_000, 40));
    backend.insert_with_latency(2, slice_details(2_000, -1), Duration::from_millis(120));

    let notes = Arc::new(RwLock::new(NoteManager::new()));
    let note_id = notes.write().create_note(
        "GC pause".to_string(),
        "#e06c75".to_string(),
        NoteType::Default { timestamp: 3_500 },
    );

    let scroll = Arc::new(RecordingScroll::new());
    let redraw = Arc::new(RedrawCounter::new());

    let ctx = SelectionContext {
        tracks: tracks.clone(),
        notes: notes.clone(),
        scroll: scroll.clone(),
        redraw: redraw.clone(),
        backend: backend.clone(),
        runtime_handle: tokio::runtime::Handle::current(),
    };
    let listener = Arc::new(|selection: &Selection, opts: &SelectionOpts| {
        info!(kind = selection.kind(), clear_search = opts.clear_search, "selection changed");
    });
    let manager = SelectionManager::with_config(ctx, config, listener)?;
    manager.register_area_aggregator(Arc::new(TrackCountAggregator));
    info!(config = ?manager.config(), "starting selection demo");

    let slice = |id| LegacySelection::Slice {
        id,
        track_uri: Some("/cpu0".to_string()),
    };

    // Fast resolution: details swap in without a gap
    manager.select_legacy(slice(1), SelectionOpts::default());
    tokio::time::sleep(Duration::from_millis(10)).await;
    report(&manager, "fast slice resolved");

    // Slow resolution: the grace period clears the old details first
    manager.select_legacy(slice(2), SelectionOpts::default());
    tokio::time::sleep(Duration::from_millis(20)).await;
    report(&manager, "slow slice in flight");
    tokio::time::sleep(Duration::from_millis(60)).await;
    report(&manager, "grace period elapsed");
    tokio::time::sleep(Duration::from_millis(120)).await;
    report(&manager, "slow slice resolved");
    info!(range = ?manager.find_time_range_of_selection().await, "incomplete slice range");

    // Area selection with one unknown track
    let area_tracks = vec!["/cpu0".to_string(), "/cpu2".to_string(), "/gpu0".to_string()];
    manager.select_area(500, 9_000, area_tracks, SelectionOpts::default())?;
    manager.toggle_track_in_area("/cpu3");
    tokio::time::sleep(Duration::from_millis(10)).await;
    info!(summary = ?manager.aggregation().summary("track_count"), "area aggregated");

    if let Err(err) = manager.select_area(10, 5, Vec::new(), SelectionOpts::default()) {
        info!(error = %err, "rejected inverted area");
    }

    manager.select_note(note_id, SelectionOpts::default());
    manager.scroll_to_current_selection();

    manager.select_search_result(&SearchResult {
        source: SearchSource::Track,
        event_id: Some(11),
        track_uri: "/cpu1".to_string(),
    });

    manager.select_track_event("/cpu1", 11, SelectionOpts::default());
    manager.scroll_to_current_selection();
    tokio::time::sleep(Duration::from_millis(10)).await;

    for request in scroll.requests() {
        info!(?request, "viewport moved");
    }
    info!(
        redraws = redraw.count(),
        backend_queries = backend.calls(),
        "demo finished"
    );

    Ok(())
}
