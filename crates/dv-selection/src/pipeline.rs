//! Debounced resolution of selection details
//!
//! Switching selection must not flash an empty details panel. Three cases:
//! 1. The backend answers within the grace period: the old details are
//!    swapped for the new ones in one step and the grace timer is cancelled.
//! 2. The backend takes longer: the grace timer clears the old details, and
//!    the new ones are installed once they arrive.
//! 3. The backend finds nothing (or fails): the details are cleared.
//!
//! Results for a superseded generation are dropped on arrival. In-flight
//! queries are never aborted.

use std::sync::Arc;

use futures::FutureExt;
use tokio::task::AbortHandle;

use crate::manager::Inner;
use crate::selection::{LegacySelection, Selection};

impl Inner {
    pub(crate) fn start_resolution(self: &Arc<Self>, generation: u64, selection: &Selection) {
        // A listener may have reselected from inside its callback
        if self.generation() != generation {
            tracing::trace!(generation, "selection superseded before resolution started");
            return;
        }

        match selection {
            Selection::Area(area) => self
                .aggregation
                .aggregate_area(area.clone(), &self.ctx.runtime_handle),
            _ => self.aggregation.clear(),
        }

        let grace_timer = self.spawn_grace_timer(generation);

        let Some(legacy) = selection.to_legacy().cloned() else {
            return;
        };

        let inner = self.clone();
        self.limiter.schedule(
            async move {
                inner.resolve_details(generation, legacy, grace_timer).await;
            }
            .boxed(),
        );
    }

    fn spawn_grace_timer(self: &Arc<Self>, generation: u64) -> AbortHandle {
        let inner = self.clone();
        let grace_period = self.config.grace_period();

        self.ctx
            .runtime_handle
            .spawn(async move {
                tokio::time::sleep(grace_period).await;
                {
                    let mut state = inner.state.lock();
                    if state.generation != generation {
                        return;
                    }
                    state.details = None;
                }
                tracing::trace!(generation, "grace period elapsed; cleared details");
                inner.ctx.redraw.schedule_full_redraw();
            })
            .abort_handle()
    }

    async fn resolve_details(
        self: Arc<Self>,
        generation: u64,
        legacy: LegacySelection,
        grace_timer: AbortHandle,
    ) {
        let details = match self.ctx.backend.resolve_legacy_selection(&legacy).await {
            Ok(details) => details,
            Err(err) => {
                tracing::warn!(
                    kind = legacy.kind_name(),
                    id = legacy.id(),
                    error = %err,
                    "failed to resolve selection details"
                );
                None
            }
        };

        self.ctx.redraw.schedule_full_redraw();
        grace_timer.abort();

        let scroll_now = {
            let mut state = self.state.lock();
            state.details = None;
            let Some(details) = details else {
                return;
            };
            if state.generation != generation {
                tracing::trace!(generation, live = state.generation, "dropping stale details");
                return;
            }
            state.details = Some(details);

            if state.pending_scroll_id == Some(legacy.id()) {
                state.pending_scroll_id = None;
                true
            } else {
                false
            }
        };

        if scroll_now {
            self.scroll_to_current_selection();
        }
    }
}
