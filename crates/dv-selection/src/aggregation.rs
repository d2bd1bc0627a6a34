//! Summaries computed over area selections
//!
//! Every registered [`AreaAggregator`] runs against each new area selection.
//! Results for an area that has since been replaced are dropped on arrival.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};

use crate::selection::AreaSelection;

/// Tabular summary of an area, as produced by an aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSummary {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Turns an area (interval plus resolved tracks) into a summary
#[async_trait::async_trait]
pub trait AreaAggregator: Send + Sync {
    /// Key the summary is published under
    fn id(&self) -> &str;

    /// `None` when the area holds nothing this aggregator understands
    async fn compute(&self, area: &AreaSelection) -> Option<AreaSummary>;
}

#[derive(Default)]
struct AggregationState {
    generation: u64,
    summaries: AHashMap<String, AreaSummary>,
}

/// Runs aggregators and holds the summaries for the current area
#[derive(Default)]
pub struct AggregationManager {
    aggregators: RwLock<Vec<Arc<dyn AreaAggregator>>>,
    state: Arc<Mutex<AggregationState>>,
}

impl AggregationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_aggregator(&self, aggregator: Arc<dyn AreaAggregator>) {
        self.aggregators.write().push(aggregator);
    }

    /// Drop current summaries and start computing new ones for `area`
    pub fn aggregate_area(&self, area: AreaSelection, runtime: &tokio::runtime::Handle) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.summaries.clear();
            state.generation
        };

        let aggregators = self.aggregators.read().clone();
        if aggregators.is_empty() {
            return;
        }

        let state = self.state.clone();
        runtime.spawn(async move {
            for aggregator in aggregators {
                let summary = aggregator.compute(&area).await;

                let mut state = state.lock();
                if state.generation != generation {
                    tracing::trace!(aggregator = aggregator.id(), "dropping stale area summary");
                    return;
                }
                match summary {
                    Some(summary) => {
                        tracing::debug!(
                            aggregator = aggregator.id(),
                            rows = summary.rows.len(),
                            "area summary ready"
                        );
                        state.summaries.insert(aggregator.id().to_string(), summary);
                    }
                    None => {
                        state.summaries.remove(aggregator.id());
                    }
                }
            }
        });
    }

    /// Forget all summaries; in-flight computations become no-ops
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.summaries.clear();
    }

    pub fn summary(&self, aggregator_id: &str) -> Option<AreaSummary> {
        self.state.lock().summaries.get(aggregator_id).cloned()
    }

    pub fn summaries(&self) -> AHashMap<String, AreaSummary> {
        self.state.lock().summaries.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().summaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Area;
    use std::time::Duration;

    struct TrackCount {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl AreaAggregator for TrackCount {
        fn id(&self) -> &str {
            "track_count"
        }

        async fn compute(&self, area: &AreaSelection) -> Option<AreaSummary> {
            tokio::time::sleep(self.delay).await;
            Some(AreaSummary {
                columns: vec!["tracks".to_string()],
                rows: vec![vec![serde_json::json!(area.area.track_uris().len())]],
            })
        }
    }

    fn area(uris: &[&str]) -> AreaSelection {
        let uris = uris.iter().map(|s| s.to_string()).collect();
        AreaSelection::new(Area::new(0, 10, uris).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_published() {
        let manager = AggregationManager::new();
        manager.register_aggregator(Arc::new(TrackCount {
            delay: Duration::from_millis(5),
        }));

        manager.aggregate_area(area(&["a", "b"]), &tokio::runtime::Handle::current());
        assert!(manager.is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let summary = manager.summary("track_count").unwrap();
        assert_eq!(summary.rows, vec![vec![serde_json::json!(2)]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_in_flight_summary() {
        let manager = AggregationManager::new();
        manager.register_aggregator(Arc::new(TrackCount {
            delay: Duration::from_millis(20),
        }));

        manager.aggregate_area(area(&["a"]), &tokio::runtime::Handle::current());
        manager.clear();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(manager.summaries().is_empty());
    }
}
