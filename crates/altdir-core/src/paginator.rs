// "Load more" pagination over a DataProvider
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::{models::Alternative, provider::DataProvider};

/// Where the cursor is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    LoadingMore,
    Exhausted,
}

/// What a `load_more` call ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { appended: usize, has_more: bool },
    /// Another load was already in flight, nothing fetched
    AlreadyLoading,
    /// No more pages, nothing fetched
    Exhausted,
    /// The category changed while the page was in flight; result thrown away
    Discarded,
    /// The fetch failed; the cursor is unchanged and the call can be retried
    Failed(String),
}

#[derive(Debug)]
struct Cursor {
    loaded_pages: u32,
    has_more: bool,
    state: PageState,
    category: Option<String>,
    items: Vec<Alternative>,
    /// Bumped on every reset so in-flight loads can tell they're outdated
    epoch: u64,
}

/// Incremental cursor over pages of listings
///
/// At most one page fetch is in flight per epoch: a second `load_more`
/// while one is loading returns `AlreadyLoading` without fetching.
pub struct Paginator {
    provider: Arc<dyn DataProvider>,
    page_size: usize,
    cursor: Mutex<Cursor>,
}

impl Paginator {
    pub fn new(provider: Arc<dyn DataProvider>, page_size: u32) -> Self {
        Self {
            provider,
            page_size: page_size.max(1) as usize,
            cursor: Mutex::new(Cursor {
                loaded_pages: 0,
                has_more: true,
                state: PageState::Idle,
                category: None,
                items: Vec::new(),
                epoch: 0,
            }),
        }
    }

    /// Start over for a (possibly different) category
    ///
    /// Page goes back to 1, `has_more` to true and the visible items are dropped.
    pub fn reset(&self, category: Option<String>) {
        let mut cursor = self.lock();
        cursor.loaded_pages = 0;
        cursor.has_more = true;
        cursor.state = PageState::Idle;
        cursor.category = category;
        cursor.items.clear();
        cursor.epoch += 1;
        debug!("Paginator reset (epoch {}, category {:?})", cursor.epoch, cursor.category);
    }

    /// Reset only if the category actually changed; returns whether it did
    pub fn set_category(&self, category: Option<String>) -> bool {
        if self.lock().category == category {
            return false;
        }
        self.reset(category);
        true
    }

    /// Fetch page 1 into an emptied visible set
    pub async fn load_first_page(&self) -> LoadOutcome {
        let category = self.category();
        self.reset(category);
        self.load_more().await
    }

    /// Fetch the next page and append it to the visible items
    pub async fn load_more(&self) -> LoadOutcome {
        let (page, category, epoch) = {
            let mut cursor = self.lock();
            match cursor.state {
                PageState::LoadingMore => return LoadOutcome::AlreadyLoading,
                PageState::Exhausted => return LoadOutcome::Exhausted,
                PageState::Idle => {}
            }
            cursor.state = PageState::LoadingMore;
            (cursor.loaded_pages + 1, cursor.category.clone(), cursor.epoch)
        };
        let mut in_flight = InFlight {
            cursor: &self.cursor,
            epoch,
            settled: false,
        };

        debug!("Loading page {} (category {:?})", page, category);
        let fetched = self.provider.fetch_page(page, category).await;
        in_flight.settled = true;

        let mut cursor = self.lock();
        if cursor.epoch != epoch {
            debug!("Discarding page {} from epoch {}", page, epoch);
            return LoadOutcome::Discarded;
        }

        match fetched {
            Ok(items) => {
                let appended = items.len();
                let has_more = appended >= self.page_size;

                cursor.items.extend(items);
                cursor.loaded_pages = page;
                cursor.has_more = has_more;
                cursor.state = if has_more {
                    PageState::Idle
                } else {
                    PageState::Exhausted
                };

                info!("Loaded page {} with {} items (more: {})", page, appended, has_more);
                LoadOutcome::Loaded { appended, has_more }
            }
            Err(e) => {
                warn!("Failed to load page {}: {}", page, e);
                cursor.state = PageState::Idle;
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn state(&self) -> PageState {
        self.lock().state
    }

    /// 1 right after a reset, then the number of the last loaded page
    pub fn current_page(&self) -> u32 {
        self.lock().loaded_pages.max(1)
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state() == PageState::LoadingMore
    }

    pub fn category(&self) -> Option<String> {
        self.lock().category.clone()
    }

    pub fn items(&self) -> Vec<Alternative> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Cursor> {
        // The cursor is only ever mutated in small complete steps
        self.cursor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Hands the loading slot back if a `load_more` future is dropped mid-fetch
struct InFlight<'a> {
    cursor: &'a Mutex<Cursor>,
    epoch: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut cursor = self.cursor.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if cursor.epoch == self.epoch && cursor.state == PageState::LoadingMore {
            debug!("Page load cancelled, cursor back to idle");
            cursor.state = PageState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::provider::MockDataProvider;
    use crate::providers::sample::{sample_alternatives, SampleCatalog};
    use crate::{Error, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Serves sample pages slowly and counts how often it was asked
    struct SlowPages {
        inner: SampleCatalog,
        calls: AtomicU32,
        delay: Duration,
    }

    #[async_trait]
    impl DataProvider for SlowPages {
        async fn fetch_all(&self) -> Result<Vec<Alternative>> {
            self.inner.fetch_all().await
        }
        async fn fetch_by_category(&self, name: &str) -> Result<Vec<Alternative>> {
            self.inner.fetch_by_category(name).await
        }
        async fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Alternative>> {
            self.inner.fetch_by_tag(tag).await
        }
        async fn fetch_by_subcategory(&self, name: &str) -> Result<Vec<Alternative>> {
            self.inner.fetch_by_subcategory(name).await
        }
        async fn fetch_by_id(&self, id: &str) -> Result<Alternative> {
            self.inner.fetch_by_id(id).await
        }
        async fn search(&self, query: &str) -> Result<Vec<Alternative>> {
            self.inner.search(query).await
        }
        async fn fetch_page(&self, page: u32, category: Option<String>) -> Result<Vec<Alternative>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.inner.fetch_page(page, category).await
        }
        async fn fetch_categories(&self) -> Result<Vec<Category>> {
            self.inner.fetch_categories().await
        }
    }

    fn slow(page_size: u32) -> Arc<SlowPages> {
        Arc::new(SlowPages {
            inner: SampleCatalog::new().with_page_size(page_size),
            calls: AtomicU32::new(0),
            delay: Duration::from_millis(30),
        })
    }

    fn hanging() -> Arc<SlowPages> {
        Arc::new(SlowPages {
            inner: SampleCatalog::new().with_page_size(5),
            calls: AtomicU32::new(0),
            delay: Duration::from_secs(3600),
        })
    }

    #[tokio::test]
    async fn test_cancelled_load_frees_the_guard() {
        let provider = hanging();
        let pager = Paginator::new(provider.clone(), 5);

        let first = tokio::time::timeout(Duration::from_millis(20), pager.load_more()).await;
        assert!(first.is_err());
        assert_eq!(pager.state(), PageState::Idle);
        assert!(pager.has_more());
        assert!(pager.is_empty());

        let second = tokio::time::timeout(Duration::from_millis(20), pager.load_more()).await;
        assert!(second.is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_load_more_fetches_once() {
        let provider = slow(5);
        let pager = Paginator::new(provider.clone(), 5);

        let (a, b) = tokio::join!(pager.load_more(), pager.load_more());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, LoadOutcome::Loaded { appended: 5, has_more: true });
        assert_eq!(b, LoadOutcome::AlreadyLoading);
        assert_eq!(pager.len(), 5);
    }

    #[tokio::test]
    async fn test_pages_append_in_order_until_exhausted() {
        let pager = Paginator::new(Arc::new(SampleCatalog::new().with_page_size(5)), 5);

        assert!(matches!(pager.load_more().await, LoadOutcome::Loaded { has_more: true, .. }));
        assert!(matches!(pager.load_more().await, LoadOutcome::Loaded { has_more: true, .. }));
        assert_eq!(
            pager.load_more().await,
            LoadOutcome::Loaded { appended: 4, has_more: false }
        );
        assert_eq!(pager.state(), PageState::Exhausted);
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.load_more().await, LoadOutcome::Exhausted);

        let expected: Vec<_> = sample_alternatives().into_iter().map(|a| a.id).collect();
        let seen: Vec<_> = pager.items().into_iter().map(|a| a.id).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_category_change_resets_cursor() {
        let pager = Paginator::new(Arc::new(SampleCatalog::new().with_page_size(2)), 2);
        pager.load_more().await;
        pager.load_more().await;
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.len(), 4);

        assert!(pager.set_category(Some("Streaming".into())));
        assert_eq!(pager.current_page(), 1);
        assert!(pager.has_more());
        assert!(pager.is_empty());
        assert!(!pager.set_category(Some("Streaming".into())));

        pager.load_more().await;
        assert!(pager.items().iter().all(|a| a.category == "Streaming"));
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_page() {
        let provider = slow(5);
        let pager = Paginator::new(provider.clone(), 5);

        let (outcome, _) = tokio::join!(pager.load_more(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            pager.reset(Some("Music".into()));
        });

        assert_eq!(outcome, LoadOutcome::Discarded);
        assert!(pager.is_empty());
        assert_eq!(pager.state(), PageState::Idle);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retryable() {
        let mut mock = MockDataProvider::new();
        let mut calls = 0;
        mock.expect_fetch_page().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(Error::TransientFetch("socket closed".into()))
            } else {
                Ok(sample_alternatives()[..3].to_vec())
            }
        });

        let pager = Paginator::new(Arc::new(mock), 3);
        assert!(matches!(pager.load_more().await, LoadOutcome::Failed(_)));
        assert_eq!(pager.state(), PageState::Idle);
        assert!(pager.has_more());
        assert_eq!(pager.current_page(), 1);

        assert_eq!(
            pager.load_more().await,
            LoadOutcome::Loaded { appended: 3, has_more: true }
        );
    }

    #[tokio::test]
    async fn test_load_first_page_replaces_items() {
        let pager = Paginator::new(Arc::new(SampleCatalog::new().with_page_size(4)), 4);
        pager.load_more().await;
        pager.load_more().await;

        pager.load_first_page().await;
        assert_eq!(pager.len(), 4);
        assert_eq!(pager.items()[0].id, "1");
    }
}
