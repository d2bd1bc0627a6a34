//! Selecting search hits

use crate::context::{ScrollRequest, TrackScroll};
use crate::manager::SelectionManager;
use crate::selection::{EventId, LegacySelection, SelectionOpts};

/// Which index a search hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    /// The track name matched
    Track,
    /// A scheduling slice matched
    Cpu,
    Log,
    Slice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub source: SearchSource,
    pub event_id: Option<EventId>,
    pub track_uri: String,
}

impl SelectionManager {
    /// Select (or, for track hits, just reveal) a search hit
    pub fn select_search_result(&self, result: &SearchResult) {
        let Some(event_id) = result.event_id else {
            return;
        };

        let from_search = SelectionOpts {
            clear_search: false,
            pending_scroll_id: Some(event_id),
            switch_to_current_selection_tab: true,
        };

        match result.source {
            SearchSource::Track => {
                self.inner.ctx.scroll.scroll_to(ScrollRequest {
                    time: None,
                    track: Some(TrackScroll {
                        uri: result.track_uri.clone(),
                        expand_group: true,
                    }),
                });
            }
            SearchSource::Cpu => self.select_sql_event("sched_slice", event_id, from_search),
            SearchSource::Slice => self.select_sql_event("slice", event_id, from_search),
            SearchSource::Log => self.select_legacy(
                LegacySelection::Log {
                    id: event_id,
                    track_uri: Some(result.track_uri.clone()),
                },
                SelectionOpts {
                    pending_scroll_id: None,
                    ..from_search
                },
            ),
        }
    }
}
