use crate::error::BookError;
use crate::models::books::{BookCard, BookDetail};
use crate::services::catalog::BookCatalog;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;

type Slot = Arc<OnceCell<Arc<Vec<BookCard>>>>;

/// Memoizes [`BookCatalog::bestsellers`] by size for the lifetime of the value.
///
/// Entries are never evicted; the map holds one slot per distinct size ever
/// requested. Concurrent first requests for the same size share one
/// computation. A failed computation leaves the slot empty, so the next
/// request retries. Detail lookups are not cached.
pub struct CachedCatalog<C> {
    inner: C,
    bestsellers: Mutex<HashMap<i32, Slot>>,
}

impl<C> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            bestsellers: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, size: i32) -> Slot {
        let mut slots = self
            .bestsellers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        slots.entry(size).or_default().clone()
    }

    /// Number of sizes with a stored result.
    pub fn len(&self) -> usize {
        self.bestsellers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_cached(&self, size: i32) -> bool {
        self.bestsellers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&size)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }
}

#[async_trait]
impl<C> BookCatalog for CachedCatalog<C>
where
    C: BookCatalog + Send + Sync,
{
    async fn bestsellers(&self, size: i32) -> Result<Arc<Vec<BookCard>>, BookError> {
        let slot = self.slot(size);

        if let Some(cards) = slot.get() {
            debug!("Bestsellers cache hit for size {}", size);
            return Ok(cards.clone());
        }

        let cards = slot
            .get_or_try_init(|| async {
                debug!("Bestsellers cache miss for size {}", size);
                self.inner.bestsellers(size).await
            })
            .await?;

        Ok(cards.clone())
    }

    async fn book_detail(&self, id: &str) -> Result<BookDetail, BookError> {
        self.inner.book_detail(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::{mock_cards, mock_detail};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingCatalog {
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl BookCatalog for CountingCatalog {
        async fn bestsellers(&self, size: i32) -> Result<Arc<Vec<BookCard>>, BookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Arc::new(mock_cards(size)))
        }

        async fn book_detail(&self, id: &str) -> Result<BookDetail, BookError> {
            Ok(mock_detail(id))
        }
    }

    struct FlakyCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BookCatalog for FlakyCatalog {
        async fn bestsellers(&self, size: i32) -> Result<Arc<Vec<BookCard>>, BookError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(BookError::Internal("first call fails".into()));
            }
            Ok(Arc::new(mock_cards(size)))
        }

        async fn book_detail(&self, id: &str) -> Result<BookDetail, BookError> {
            Ok(mock_detail(id))
        }
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache = CachedCatalog::new(CountingCatalog::default());

        let first = cache.bestsellers(3).await.unwrap();
        let second = cache.bestsellers(3).await.unwrap();

        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_cached(3));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_sizes_are_cached_independently() {
        let cache = CachedCatalog::new(CountingCatalog::default());

        assert_eq!(cache.bestsellers(2).await.unwrap().len(), 2);
        assert_eq!(cache.bestsellers(7).await.unwrap().len(), 7);
        assert_eq!(cache.bestsellers(2).await.unwrap().len(), 2);

        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
        assert!(!cache.is_cached(4));
    }

    #[tokio::test]
    async fn test_concurrent_misses_compute_once() {
        let cache = Arc::new(CachedCatalog::new(CountingCatalog {
            calls: AtomicUsize::new(0),
            delay: Some(Duration::from_millis(20)),
        }));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.bestsellers(10).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 10);
        }
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = CachedCatalog::new(FlakyCatalog {
            calls: AtomicUsize::new(0),
        });

        assert!(cache.bestsellers(4).await.is_err());
        assert!(cache.is_empty());

        assert_eq!(cache.bestsellers(4).await.unwrap().len(), 4);
        assert!(cache.is_cached(4));
    }

    #[tokio::test]
    async fn test_detail_is_delegated() {
        let cache = CachedCatalog::new(CountingCatalog::default());
        let detail = cache.book_detail("abc123").await.unwrap();

        assert_eq!(detail.id, "abc123");
        assert!(cache.is_empty());
    }
}
