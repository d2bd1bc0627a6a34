//! The selection manager
//!
//! There are two selection-related states here:
//! 1. the *locator* ([`Selection`]), set synchronously by the `select_*`
//!    methods and visible to callers immediately;
//! 2. the *resolved details* ([`ResolvedDetails`]), filled in a little later
//!    by querying the details backend.
//!
//! Every locator change bumps a generation counter. Background work captures
//! the generation it was started for and becomes a no-op once the counter has
//! moved on.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::aggregation::{AggregationManager, AreaAggregator};
use crate::config::SelectionConfig;
use crate::context::{SelectionContext, SelectionListener};
use crate::limiter::AsyncLimiter;
use crate::resolver::{resolver_from_fn, ResolverRegistry, SelectionResolver};
use crate::selection::{
    Area, AreaSelection, EventId, GenericSliceSelection, LegacySelection, ResolvedDetails,
    Selection, SelectionOpts,
};
use crate::time::Time;
use crate::SelectionError;

#[derive(Debug, Default)]
pub(crate) struct SelectionState {
    pub(crate) selection: Selection,
    pub(crate) details: Option<ResolvedDetails>,
    pub(crate) pending_scroll_id: Option<EventId>,
    /// Incremented every time `selection` changes
    pub(crate) generation: u64,
}

pub(crate) struct Inner {
    pub(crate) state: Mutex<SelectionState>,
    pub(crate) ctx: SelectionContext,
    pub(crate) config: SelectionConfig,
    pub(crate) listener: Arc<dyn SelectionListener>,
    pub(crate) resolvers: ResolverRegistry,
    pub(crate) aggregation: AggregationManager,
    pub(crate) limiter: AsyncLimiter,
}

impl Inner {
    pub(crate) fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

/// Owns the current selection and coordinates its resolution
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct SelectionManager {
    pub(crate) inner: Arc<Inner>,
}

impl SelectionManager {
    /// Create a manager with the default config
    pub fn new(ctx: SelectionContext, listener: Arc<dyn SelectionListener>) -> Self {
        Self::build(ctx, SelectionConfig::default(), listener)
    }

    pub fn with_config(
        ctx: SelectionContext,
        config: SelectionConfig,
        listener: Arc<dyn SelectionListener>,
    ) -> Result<Self, SelectionError> {
        config.validate()?;
        Ok(Self::build(ctx, config, listener))
    }

    fn build(
        ctx: SelectionContext,
        config: SelectionConfig,
        listener: Arc<dyn SelectionListener>,
    ) -> Self {
        let limiter = AsyncLimiter::new(&ctx.runtime_handle);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SelectionState::default()),
                ctx,
                config,
                listener,
                resolvers: ResolverRegistry::new(),
                aggregation: AggregationManager::new(),
                limiter,
            }),
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.inner.config
    }

    pub fn register_area_aggregator(&self, aggregator: Arc<dyn AreaAggregator>) {
        self.inner.aggregation.register_aggregator(aggregator);
    }

    /// Resolvers for the same category are tried in registration order
    pub fn register_resolver(&self, resolver: Arc<dyn SelectionResolver>) {
        self.inner.resolvers.register(resolver);
    }

    /// Register a closure as the resolver for `category`
    pub fn register_resolver_fn<F>(&self, category: impl Into<String>, callback: F)
    where
        F: Fn(EventId, String) -> BoxFuture<'static, Option<Selection>> + Send + Sync + 'static,
    {
        self.register_resolver(resolver_from_fn(category, callback));
    }

    pub fn clear(&self) {
        self.set_selection(Selection::Empty, SelectionOpts::default());
    }

    pub fn select_track_event(
        &self,
        track_uri: impl Into<String>,
        event_id: EventId,
        opts: SelectionOpts,
    ) {
        self.set_selection(
            Selection::Single {
                track_uri: track_uri.into(),
                event_id,
            },
            opts,
        );
    }

    pub fn select_note(&self, id: impl Into<String>, opts: SelectionOpts) {
        self.set_selection(Selection::Note { id: id.into() }, opts);
    }

    /// Select `[start, end]` over `track_uris`
    ///
    /// Fails without touching the current selection when `start > end`.
    pub fn select_area(
        &self,
        start: Time,
        end: Time,
        track_uris: Vec<String>,
        opts: SelectionOpts,
    ) -> Result<(), SelectionError> {
        let area = Area::new(start, end, track_uris)?;
        self.set_selection(Selection::Area(AreaSelection::new(area)), opts);
        Ok(())
    }

    /// Add or remove one track from the current area selection
    pub fn toggle_track_in_area(&self, track_uri: &str) {
        let Selection::Area(mut area) = self.selection() else {
            return;
        };
        area.area.toggle_track(track_uri);
        self.set_selection(Selection::Area(area), SelectionOpts::default());
    }

    /// Remove all of `track_uris` if all are selected, else add the missing ones
    pub fn toggle_track_group_in_area(&self, track_uris: &[String]) {
        let Selection::Area(mut area) = self.selection() else {
            return;
        };
        area.area.toggle_track_group(track_uris);
        self.set_selection(Selection::Area(area), SelectionOpts::default());
    }

    pub fn select_legacy(&self, legacy: LegacySelection, opts: SelectionOpts) {
        self.set_selection(Selection::Legacy(legacy), opts);
    }

    /// Select a slice from an arbitrary table
    ///
    /// The slice id is merged into its details panel config.
    pub fn select_generic_slice(&self, mut slice: GenericSliceSelection) {
        if let Some(config) = slice.details_panel.config.as_object_mut() {
            config.insert("id".to_string(), serde_json::Value::from(slice.id));
        }
        self.select_legacy(LegacySelection::GenericSlice(slice), SelectionOpts::default());
    }

    /// Look up `id` through the resolvers for `category` and select the result
    ///
    /// Returns `false`, leaving the selection untouched, when no resolver
    /// answers.
    pub async fn select_by_external_reference(
        &self,
        category: &str,
        id: EventId,
        opts: SelectionOpts,
    ) -> bool {
        match self.inner.resolvers.resolve(category, id).await {
            Some(selection) => {
                self.set_selection(selection, opts);
                true
            }
            None => {
                tracing::debug!(category, id, "no resolver matched external reference");
                false
            }
        }
    }

    /// Fire-and-forget form of [`select_by_external_reference`](Self::select_by_external_reference)
    pub fn select_sql_event(
        &self,
        sql_table_name: impl Into<String>,
        id: EventId,
        opts: SelectionOpts,
    ) {
        let manager = self.clone();
        let sql_table_name = sql_table_name.into();
        self.inner.ctx.runtime_handle.spawn(async move {
            manager
                .select_by_external_reference(&sql_table_name, id, opts)
                .await;
        });
    }

    pub fn selection(&self) -> Selection {
        self.inner.state.lock().selection.clone()
    }

    pub fn legacy_selection(&self) -> Option<LegacySelection> {
        self.inner.state.lock().selection.to_legacy().cloned()
    }

    /// Details for the current selection, once resolved
    pub fn selection_details(&self) -> Option<ResolvedDetails> {
        self.inner.state.lock().details.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation()
    }

    pub fn pending_scroll_id(&self) -> Option<EventId> {
        self.inner.state.lock().pending_scroll_id
    }

    pub fn aggregation(&self) -> &AggregationManager {
        &self.inner.aggregation
    }

    fn set_selection(&self, mut selection: Selection, opts: SelectionOpts) {
        // Consumers want descriptors, not uris; resolve them once here
        if let Selection::Area(area) = &mut selection {
            let tracks = &self.inner.ctx.tracks;
            area.tracks = area
                .area
                .track_uris()
                .iter()
                .filter_map(|uri| tracks.get_track(uri))
                .collect();
        }

        let generation = {
            let mut state = self.inner.state.lock();
            state.selection = selection.clone();
            state.pending_scroll_id = opts.pending_scroll_id;
            state.generation += 1;
            state.generation
        };

        tracing::debug!(kind = selection.kind(), generation, "selection changed");

        self.inner.listener.on_selection_change(&selection, &opts);
        self.inner.ctx.redraw.schedule_full_redraw();

        self.inner.start_resolution(generation, &selection);
    }
}
