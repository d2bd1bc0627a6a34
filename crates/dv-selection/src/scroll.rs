//! Scrolling the viewport to the current selection

use std::sync::Arc;

use crate::config::SelectionConfig;
use crate::context::{NoteStore, ScrollRequest, TrackCatalog, TrackScroll};
use crate::manager::{Inner, SelectionManager};
use crate::notes::NoteType;
use crate::selection::{LegacySelection, ResolvedDetails, Selection};
use crate::time::{Duration, Time, TimeSpan, INCOMPLETE_DURATION};

/// Span to focus for a slice-like object
///
/// Instant and incomplete slices get a synthetic width. Missing bounds give
/// [`TimeSpan::INVALID`] rather than `None`.
pub fn find_time_range_of_slice(
    ts: Option<Time>,
    dur: Option<Duration>,
    config: &SelectionConfig,
) -> TimeSpan {
    match (ts, dur) {
        (Some(ts), Some(INCOMPLETE_DURATION)) => {
            TimeSpan::from_time_and_duration(ts, config.incomplete_slice_duration)
        }
        (Some(ts), Some(0)) => TimeSpan::from_time_and_duration(ts, config.instant_focus_duration),
        (Some(ts), Some(dur)) => TimeSpan::from_time_and_duration(ts, dur),
        _ => TimeSpan::INVALID,
    }
}

/// Span of the timeline implied by `selection`
///
/// `details` are the resolved details for `selection`, if any.
pub async fn find_time_range(
    selection: &Selection,
    details: Option<&ResolvedDetails>,
    tracks: &dyn TrackCatalog,
    notes: &dyn NoteStore,
    config: &SelectionConfig,
) -> Option<TimeSpan> {
    match selection {
        Selection::Empty => return None,
        Selection::Area(area) => return Some(area.area.span()),
        Selection::Note { id } => {
            let note = notes.get_note(id)?;
            return Some(match note.note_type {
                NoteType::Span { start, end } => TimeSpan::new(start, end),
                NoteType::Default { timestamp } => {
                    TimeSpan::from_time_and_duration(timestamp, config.instant_focus_duration)
                }
            });
        }
        Selection::Single { track_uri, event_id } => {
            let bounds = tracks.event_bounds(track_uri, *event_id).await?;
            return Some(TimeSpan::from_time_and_duration(bounds.ts, bounds.dur));
        }
        Selection::Legacy(_) | Selection::Union(_) => {}
    }

    match selection.to_legacy()? {
        LegacySelection::SchedSlice { .. }
        | LegacySelection::Slice { .. }
        | LegacySelection::ThreadState { .. } => {
            let details = details.cloned().unwrap_or_default();
            Some(find_time_range_of_slice(details.ts, details.dur, config))
        }
        // TODO: focus log entries once the log track exposes event bounds
        LegacySelection::Log { .. } => None,
        LegacySelection::GenericSlice(slice) => Some(find_time_range_of_slice(
            Some(slice.start),
            Some(slice.duration),
            config,
        )),
    }
}

/// Track a scroll should bring into view for `selection`
fn primary_track(selection: &Selection) -> Option<TrackScroll> {
    let uri = match selection.to_legacy() {
        Some(legacy) => legacy.track_uri(),
        None => match selection {
            Selection::Single { track_uri, .. } => Some(track_uri.as_str()),
            _ => None,
        },
    }?;
    Some(TrackScroll {
        uri: uri.to_string(),
        expand_group: true,
    })
}

impl Inner {
    pub(crate) async fn find_time_range_of_selection(&self) -> Option<TimeSpan> {
        let (selection, details) = {
            let state = self.state.lock();
            (state.selection.clone(), state.details.clone())
        };
        find_time_range(
            &selection,
            details.as_ref(),
            self.ctx.tracks.as_ref(),
            self.ctx.notes.as_ref(),
            &self.config,
        )
        .await
    }

    pub(crate) fn scroll_to_current_selection(self: &Arc<Self>) {
        let (selection, details) = {
            let state = self.state.lock();
            (state.selection.clone(), state.details.clone())
        };
        let legacy = selection.to_legacy().cloned();
        let track = primary_track(&selection);

        let inner = self.clone();
        self.ctx.runtime_handle.spawn(async move {
            let range = find_time_range(
                &selection,
                details.as_ref(),
                inner.ctx.tracks.as_ref(),
                inner.ctx.notes.as_ref(),
                &inner.config,
            )
            .await;

            // Drop the request if the selection changed meanwhile. Legacy
            // views compare by value, so reselecting an equal one still scrolls.
            {
                let state = inner.state.lock();
                let changed = match &legacy {
                    Some(legacy) => state.selection.to_legacy() != Some(legacy),
                    None => state.selection != selection,
                };
                if changed {
                    tracing::trace!("selection changed while computing scroll range");
                    return;
                }
            }

            if range.is_none() && track.is_none() {
                return;
            }
            inner.ctx.scroll.scroll_to(ScrollRequest { time: range, track });
        });
    }
}

impl SelectionManager {
    /// Move the viewport to the current selection and its track
    pub fn scroll_to_current_selection(&self) {
        self.inner.scroll_to_current_selection();
    }

    /// Span of the timeline implied by the current selection
    pub async fn find_time_range_of_selection(&self) -> Option<TimeSpan> {
        self.inner.find_time_range_of_selection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EventBounds;
    use crate::memory::TrackRegistry;
    use crate::notes::NoteManager;
    use crate::selection::{DetailsPanelConfig, GenericSliceSelection, SelectionOpts};
    use crate::testing::Harness;
    use parking_lot::RwLock;
    use std::time::Duration as StdDuration;

    fn config() -> SelectionConfig {
        SelectionConfig::default()
    }

    #[test]
    fn test_slice_range_rules() {
        let config = config();
        assert_eq!(
            find_time_range_of_slice(Some(50), Some(-1), &config),
            TimeSpan::new(50, 30_050)
        );
        assert_eq!(find_time_range_of_slice(Some(50), Some(0), &config), TimeSpan::new(50, 51));
        assert_eq!(find_time_range_of_slice(Some(50), Some(20), &config), TimeSpan::new(50, 70));
        assert_eq!(find_time_range_of_slice(Some(50), None, &config), TimeSpan::INVALID);
        assert_eq!(find_time_range_of_slice(None, None, &config), TimeSpan::INVALID);
    }

    async fn range_of(
        selection: Selection,
        details: Option<ResolvedDetails>,
        notes: &RwLock<NoteManager>,
    ) -> Option<TimeSpan> {
        let tracks = TrackRegistry::new();
        tracks.add_track("/t", "Track");
        tracks.set_event_bounds("/t", 3, EventBounds { ts: 40, dur: 6 });
        find_time_range(&selection, details.as_ref(), &tracks, notes, &config()).await
    }

    #[tokio::test]
    async fn test_note_ranges() {
        let notes = RwLock::new(NoteManager::new());
        let point = notes.write().create_note(
            "point".into(),
            "red".into(),
            NoteType::Default { timestamp: 1_000 },
        );
        let span = notes.write().create_note(
            "span".into(),
            "blue".into(),
            NoteType::Span { start: 10, end: 20 },
        );

        assert_eq!(
            range_of(Selection::Note { id: point }, None, &notes).await,
            Some(TimeSpan::new(1_000, 1_001))
        );
        assert_eq!(
            range_of(Selection::Note { id: span }, None, &notes).await,
            Some(TimeSpan::new(10, 20))
        );
        assert_eq!(range_of(Selection::Note { id: "gone".into() }, None, &notes).await, None);
    }

    #[tokio::test]
    async fn test_single_and_legacy_ranges() {
        let notes = RwLock::new(NoteManager::new());

        let single = Selection::Single { track_uri: "/t".into(), event_id: 3 };
        assert_eq!(range_of(single, None, &notes).await, Some(TimeSpan::new(40, 46)));

        let unknown = Selection::Single { track_uri: "/t".into(), event_id: 4 };
        assert_eq!(range_of(unknown, None, &notes).await, None);

        let sched = Selection::Legacy(LegacySelection::SchedSlice { id: 1, track_uri: None });
        let incomplete = ResolvedDetails {
            ts: Some(500),
            dur: Some(-1),
            ..Default::default()
        };
        assert_eq!(
            range_of(sched.clone(), Some(incomplete), &notes).await,
            Some(TimeSpan::new(500, 30_500))
        );
        // Unresolved slices give an invalid span, not None
        assert_eq!(range_of(sched, None, &notes).await, Some(TimeSpan::INVALID));

        let log = Selection::Legacy(LegacySelection::Log { id: 1, track_uri: None });
        assert_eq!(range_of(log, None, &notes).await, None);
        assert_eq!(range_of(Selection::Empty, None, &notes).await, None);
    }

    #[tokio::test]
    async fn test_generic_slice_and_union_ranges() {
        let notes = RwLock::new(NoteManager::new());
        let generic = LegacySelection::GenericSlice(GenericSliceSelection {
            id: 9,
            sql_table_name: "startups".into(),
            start: 100,
            duration: 0,
            track_uri: "/startups".into(),
            details_panel: DetailsPanelConfig {
                kind: "startup".into(),
                config: serde_json::json!({}),
            },
        });

        let union = Selection::Union(vec![Selection::Empty, Selection::Legacy(generic)]);
        assert_eq!(range_of(union, None, &notes).await, Some(TimeSpan::new(100, 101)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_to_area_has_no_track() {
        let h = Harness::new();
        h.manager
            .select_area(5, 15, vec!["/cpu0".into()], SelectionOpts::default())
            .unwrap();

        h.manager.scroll_to_current_selection();
        tokio::time::sleep(StdDuration::from_millis(1)).await;

        let requests = h.scroll.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].time, Some(TimeSpan::new(5, 15)));
        assert!(requests[0].track.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_to_single_event() {
        let h = Harness::new();
        h.tracks.set_event_bounds("/cpu0", 11, EventBounds { ts: 300, dur: 0 });

        h.manager.select_track_event("/cpu0", 11, SelectionOpts::default());
        h.manager.scroll_to_current_selection();
        tokio::time::sleep(StdDuration::from_millis(1)).await;

        let requests = h.scroll.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].time, Some(TimeSpan::new(300, 300)));
        assert_eq!(requests[0].track.as_ref().map(|t| t.uri.as_str()), Some("/cpu0"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_dropped_when_selection_changes() {
        let h = Harness::new();
        h.tracks.set_event_bounds_with_latency(
            "/cpu0",
            11,
            EventBounds { ts: 300, dur: 10 },
            StdDuration::from_millis(20),
        );

        h.manager.select_track_event("/cpu0", 11, SelectionOpts::default());
        h.manager.scroll_to_current_selection();
        h.manager.select_note("other", SelectionOpts::default());

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert!(h.scroll.requests().is_empty());
    }
}
