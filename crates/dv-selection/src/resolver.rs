//! Registry of resolvers turning external references into selections

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;

use crate::selection::{EventId, Selection};

/// Maps an id in some category (typically a SQL table) to a selection
#[async_trait::async_trait]
pub trait SelectionResolver: Send + Sync {
    /// Category this resolver answers for
    fn category(&self) -> &str;

    /// `None` declines, letting the next resolver for the category try
    async fn resolve(&self, id: EventId, category: &str) -> Option<Selection>;
}

/// Helper struct for creating resolvers from closures
pub struct ClosureResolver<F> {
    category: String,
    callback: F,
}

#[async_trait::async_trait]
impl<F> SelectionResolver for ClosureResolver<F>
where
    F: Fn(EventId, String) -> BoxFuture<'static, Option<Selection>> + Send + Sync,
{
    fn category(&self) -> &str {
        &self.category
    }

    async fn resolve(&self, id: EventId, category: &str) -> Option<Selection> {
        (self.callback)(id, category.to_string()).await
    }
}

/// Create a resolver from a closure
pub fn resolver_from_fn<F>(category: impl Into<String>, callback: F) -> Arc<dyn SelectionResolver>
where
    F: Fn(EventId, String) -> BoxFuture<'static, Option<Selection>> + Send + Sync + 'static,
{
    Arc::new(ClosureResolver {
        category: category.into(),
        callback,
    })
}

/// Append-only list of resolvers, consulted in registration order
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: RwLock<Vec<Arc<dyn SelectionResolver>>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, resolver: Arc<dyn SelectionResolver>) {
        tracing::debug!(category = resolver.category(), "registered selection resolver");
        self.resolvers.write().push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }

    /// First non-declining answer among the resolvers for `category`
    pub async fn resolve(&self, category: &str, id: EventId) -> Option<Selection> {
        // Snapshot so registration during a lookup is not blocked
        let matching: Vec<_> = self
            .resolvers
            .read()
            .iter()
            .filter(|r| r.category() == category)
            .cloned()
            .collect();

        for resolver in matching {
            if let Some(selection) = resolver.resolve(id, category).await {
                return Some(selection);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn note(id: &str) -> Selection {
        Selection::Note { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_first_non_declining_wins() {
        let registry = ResolverRegistry::new();
        let late_calls = Arc::new(AtomicUsize::new(0));

        registry.register(resolver_from_fn("X", |_, _| async { None::<Selection> }.boxed()));
        registry.register(resolver_from_fn("X", |id, _| {
            async move { Some(note(&format!("b-{id}"))) }.boxed()
        }));
        let counter = late_calls.clone();
        registry.register(resolver_from_fn("X", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Some(note("c")) }.boxed()
        }));

        assert_eq!(registry.resolve("X", 5).await, Some(note("b-5")));
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_category_filtering() {
        let registry = ResolverRegistry::new();
        assert!(registry.is_empty());
        registry.register(resolver_from_fn("slice", |_, category| {
            async move { Some(note(&category)) }.boxed()
        }));

        assert_eq!(registry.resolve("slice", 1).await, Some(note("slice")));
        assert_eq!(registry.resolve("sched_slice", 1).await, None);
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
