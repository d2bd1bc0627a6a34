//! Shared fixtures for unit tests

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::context::{DetailsBackend, SelectionContext, SelectionListener};
use crate::memory::{RecordingScroll, RedrawCounter, StaticDetailsBackend, TrackRegistry};
use crate::notes::NoteManager;
use crate::selection::{Selection, SelectionOpts};
use crate::SelectionManager;

type Hook = Arc<dyn Fn(&Selection) + Send + Sync>;

#[derive(Default)]
pub(crate) struct RecordingListener {
    calls: Mutex<Vec<(Selection, SelectionOpts)>>,
    hook: Mutex<Option<Hook>>,
}

impl RecordingListener {
    pub(crate) fn calls(&self) -> Vec<(Selection, SelectionOpts)> {
        self.calls.lock().clone()
    }

    pub(crate) fn last(&self) -> Option<(Selection, SelectionOpts)> {
        self.calls.lock().last().cloned()
    }

    /// Run `hook` after recording each change; it may reselect
    pub(crate) fn set_hook(&self, hook: impl Fn(&Selection) + Send + Sync + 'static) {
        *self.hook.lock() = Some(Arc::new(hook));
    }
}

impl SelectionListener for RecordingListener {
    fn on_selection_change(&self, selection: &Selection, opts: &SelectionOpts) {
        self.calls.lock().push((selection.clone(), opts.clone()));
        let hook = self.hook.lock().clone();
        if let Some(hook) = hook {
            hook(selection);
        }
    }
}

pub(crate) struct Harness {
    pub(crate) manager: SelectionManager,
    pub(crate) tracks: Arc<TrackRegistry>,
    pub(crate) notes: Arc<RwLock<NoteManager>>,
    pub(crate) scroll: Arc<RecordingScroll>,
    pub(crate) redraw: Arc<RedrawCounter>,
    pub(crate) backend: Arc<StaticDetailsBackend>,
    pub(crate) listener: Arc<RecordingListener>,
}

impl Harness {
    /// Must be called from within a tokio runtime
    pub(crate) fn new() -> Self {
        Self::with_backend(|backend| backend as Arc<dyn DetailsBackend>)
    }

    /// Like [`Harness::new`], with the details backend wrapped by `wrap`
    pub(crate) fn with_backend(
        wrap: impl FnOnce(Arc<StaticDetailsBackend>) -> Arc<dyn DetailsBackend>,
    ) -> Self {
        let tracks = Arc::new(TrackRegistry::new());
        let notes = Arc::new(RwLock::new(NoteManager::new()));
        let scroll = Arc::new(RecordingScroll::new());
        let redraw = Arc::new(RedrawCounter::new());
        let backend = Arc::new(StaticDetailsBackend::new());
        let listener = Arc::new(RecordingListener::default());

        let ctx = SelectionContext {
            tracks: tracks.clone(),
            notes: notes.clone(),
            scroll: scroll.clone(),
            redraw: redraw.clone(),
            backend: wrap(backend.clone()),
            runtime_handle: tokio::runtime::Handle::current(),
        };
        let manager = SelectionManager::new(ctx, listener.clone());

        Self {
            manager,
            tracks,
            notes,
            scroll,
            redraw,
            backend,
            listener,
        }
    }
}
