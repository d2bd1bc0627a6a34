//! Selection tracking and resolution for the data visualization platform
//!
//! This crate keeps track of what is currently selected on the timeline and
//! resolves that lightweight locator into rich details in the background,
//! without showing stale details and without flicker on rapid reselection.

pub mod aggregation;
pub mod config;
pub mod context;
pub mod limiter;
pub mod memory;
pub mod notes;
pub mod resolver;
pub mod scroll;
pub mod search;
pub mod selection;
pub mod time;

mod manager;
mod pipeline;

#[cfg(test)]
mod testing;

use thiserror::Error;

// Re-export commonly used types
pub use aggregation::{AggregationManager, AreaAggregator, AreaSummary};
pub use config::SelectionConfig;
pub use context::{
    DetailsBackend, EventBounds, NoteStore, RedrawScheduler, ScrollHelper, ScrollRequest,
    SelectionContext, SelectionListener, TrackCatalog, TrackScroll,
};
pub use manager::SelectionManager;
pub use resolver::{resolver_from_fn, SelectionResolver};
pub use search::{SearchResult, SearchSource};
pub use selection::{
    Area, AreaSelection, DetailsPanelConfig, EventId, GenericSliceSelection, LegacySelection,
    ResolvedDetails, Selection, SelectionOpts, TrackDescriptor,
};
pub use time::{Duration, Time, TimeSpan};

/// Errors that can occur in selection operations
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("invalid area: start {start} is after end {end}")]
    InvalidArea { start: Time, end: Time },

    #[error("invalid selection config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse selection config: {0}")]
    Config(#[from] serde_json::Error),
}
