// Remote-first provider that quietly degrades to the sample catalog
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    fallback::{with_fallback, with_fallback_one, with_fallback_source, Source},
    models::{Alternative, Category},
    provider::{normalize_category, DataProvider},
    providers::sample::SampleCatalog,
    Result,
};

/// Ask the primary source first; on failure or an empty answer, serve the
/// sample catalog. Only a genuinely unknown id ever comes back as an error.
///
/// Paged listings stick to whichever source served their first page, so a
/// remote listing's short last page never gets sample items appended.
pub struct FallbackProvider {
    primary: Box<dyn DataProvider>,
    fallback: SampleCatalog,
    page_sources: Mutex<HashMap<Option<String>, Source>>,
}

impl FallbackProvider {
    pub fn new(primary: Box<dyn DataProvider>, fallback: SampleCatalog) -> Self {
        Self {
            primary,
            fallback,
            page_sources: Mutex::new(HashMap::new()),
        }
    }

    fn page_sources(&self) -> MutexGuard<'_, HashMap<Option<String>, Source>> {
        self.page_sources.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DataProvider for FallbackProvider {
    async fn fetch_all(&self) -> Result<Vec<Alternative>> {
        with_fallback("fetch_all", self.primary.fetch_all(), || {
            self.fallback.fetch_all()
        })
        .await
    }

    async fn fetch_by_category(&self, name: &str) -> Result<Vec<Alternative>> {
        with_fallback("fetch_by_category", self.primary.fetch_by_category(name), || {
            self.fallback.fetch_by_category(name)
        })
        .await
    }

    async fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Alternative>> {
        with_fallback("fetch_by_tag", self.primary.fetch_by_tag(tag), || {
            self.fallback.fetch_by_tag(tag)
        })
        .await
    }

    async fn fetch_by_subcategory(&self, name: &str) -> Result<Vec<Alternative>> {
        with_fallback(
            "fetch_by_subcategory",
            self.primary.fetch_by_subcategory(name),
            || self.fallback.fetch_by_subcategory(name),
        )
        .await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Alternative> {
        with_fallback_one("fetch_by_id", self.primary.fetch_by_id(id), || {
            self.fallback.fetch_by_id(id)
        })
        .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Alternative>> {
        with_fallback("search", self.primary.search(query), || {
            self.fallback.search(query)
        })
        .await
    }

    async fn fetch_page(&self, page: u32, category: Option<String>) -> Result<Vec<Alternative>> {
        let key = category
            .as_deref()
            .and_then(normalize_category)
            .map(str::to_string);

        if page <= 1 {
            let (source, items) = with_fallback_source(
                "fetch_page",
                self.primary.fetch_page(page, category.clone()),
                || self.fallback.fetch_page(page, category),
            )
            .await;
            self.page_sources().insert(key, source);
            return Ok(items);
        }

        let source = self.page_sources().get(&key).copied();
        match source {
            Some(Source::Fallback) => {
                debug!("fetch_page: page {} continues from fallback data", page);
                self.fallback.fetch_page(page, category).await
            }
            // An empty remote page is the end of the remote listing, and a
            // failure is left for the caller to retry.
            _ => self.primary.fetch_page(page, category).await,
        }
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        with_fallback("fetch_categories", self.primary.fetch_categories(), || {
            self.fallback.fetch_categories()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginator::{LoadOutcome, Paginator};
    use crate::provider::MockDataProvider;
    use crate::Error;
    use std::sync::Arc;

    fn ids(items: &[Alternative]) -> Vec<&str> {
        items.iter().map(|a| a.id.as_str()).collect()
    }

    fn offline() -> MockDataProvider {
        let mut mock = MockDataProvider::new();
        mock.expect_fetch_by_category()
            .returning(|_| Err(Error::TransientFetch("connection refused".into())));
        mock.expect_fetch_by_id()
            .returning(|id| Err(Error::TransientFetch(format!("timeout fetching {}", id))));
        mock.expect_search().returning(|_| Ok(Vec::new()));
        mock
    }

    #[tokio::test]
    async fn test_failed_remote_serves_sample_data() {
        let provider = FallbackProvider::new(Box::new(offline()), SampleCatalog::new());

        let streaming = provider.fetch_by_category("Streaming").await.unwrap();
        assert_eq!(streaming.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_remote_search_serves_sample_matches() {
        let provider = FallbackProvider::new(Box::new(offline()), SampleCatalog::new());

        let hits = provider.search("netflix").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "4");
    }

    #[tokio::test]
    async fn test_not_found_only_when_absent_everywhere() {
        let provider = FallbackProvider::new(Box::new(offline()), SampleCatalog::new());

        assert_eq!(provider.fetch_by_id("1").await.unwrap().name, "Swiggy");
        assert!(provider.fetch_by_id("missing").await.unwrap_err().is_not_found());
    }

    fn remote_items(count: usize) -> Vec<Alternative> {
        let template = crate::providers::sample::sample_alternatives().remove(0);
        (0..count)
            .map(|i| Alternative {
                id: format!("remote-{}", i),
                ..template.clone()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_short_remote_page_ends_listing_without_sample_items() {
        let mut mock = MockDataProvider::new();
        mock.expect_fetch_page()
            .withf(|page, _| *page == 1)
            .returning(|_, _| Ok(remote_items(12)));
        mock.expect_fetch_page()
            .withf(|page, _| *page == 2)
            .returning(|_, _| Ok(Vec::new()));

        let provider = Arc::new(FallbackProvider::new(Box::new(mock), SampleCatalog::new()));
        let pager = Paginator::new(provider, 12);

        assert_eq!(
            pager.load_more().await,
            LoadOutcome::Loaded { appended: 12, has_more: true }
        );
        assert_eq!(
            pager.load_more().await,
            LoadOutcome::Loaded { appended: 0, has_more: false }
        );
        let items = pager.items();
        assert_eq!(items.len(), 12);
        assert!(items.iter().all(|a| a.id.starts_with("remote-")));
    }

    #[tokio::test]
    async fn test_fallback_listing_keeps_paging_from_sample() {
        let mut mock = MockDataProvider::new();
        mock.expect_fetch_page()
            .times(1)
            .returning(|_, _| Err(Error::TransientFetch("connection refused".into())));

        let provider = FallbackProvider::new(Box::new(mock), SampleCatalog::new());

        let first = provider.fetch_page(1, None).await.unwrap();
        let second = provider.fetch_page(2, None).await.unwrap();
        assert_eq!(first.len(), 12);
        assert_eq!(ids(&second), vec!["13", "14"]);
    }

    #[tokio::test]
    async fn test_remote_failure_mid_listing_is_retryable() {
        let mut mock = MockDataProvider::new();
        mock.expect_fetch_page()
            .withf(|page, _| *page == 1)
            .returning(|_, _| Ok(remote_items(12)));
        mock.expect_fetch_page()
            .withf(|page, _| *page == 2)
            .returning(|_, _| Err(Error::TransientFetch("timeout".into())));

        let provider = FallbackProvider::new(Box::new(mock), SampleCatalog::new());
        provider.fetch_page(1, Some("All".into())).await.unwrap();

        let err = provider.fetch_page(2, None).await.unwrap_err();
        assert!(matches!(err, Error::TransientFetch(_)));
    }

    #[tokio::test]
    async fn test_remote_results_win() {
        let mut mock = MockDataProvider::new();
        mock.expect_fetch_page()
            .withf(|page, category| *page == 2 && category.as_deref() == Some("Music"))
            .times(1)
            .returning(|_, _| {
                let mut remote = crate::providers::sample::sample_alternatives();
                remote.truncate(1);
                remote[0].id = "remote-1".into();
                Ok(remote)
            });

        let provider = FallbackProvider::new(Box::new(mock), SampleCatalog::new());
        let page = provider.fetch_page(2, Some("Music".into())).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "remote-1");
    }
}
