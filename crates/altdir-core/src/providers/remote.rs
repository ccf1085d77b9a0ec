// Remote provider - bridges the backend client with the DataProvider trait
use async_trait::async_trait;
use altdir_api::{BusinessRecord, CategoryRecord, DirectoryClient};
use tracing::warn;

use crate::{
    models::{Alternative, Category, CategoryIcon, Pricing},
    provider::{normalize_category, DataProvider},
    providers::sample::DEFAULT_PAGE_SIZE,
    Result,
};

/// Wrapper around DirectoryClient that implements DataProvider
///
/// Errors are passed through untouched; degrading to sample data is the
/// `FallbackProvider`'s business, not this one's.
pub struct RemoteProvider {
    client: DirectoryClient,
    page_size: u32,
}

impl RemoteProvider {
    pub fn new(client: DirectoryClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[async_trait]
impl DataProvider for RemoteProvider {
    async fn fetch_all(&self) -> Result<Vec<Alternative>> {
        let rows = self.client.list_businesses().await?;
        Ok(convert_all(rows))
    }

    async fn fetch_by_category(&self, name: &str) -> Result<Vec<Alternative>> {
        let rows = match normalize_category(name) {
            Some(category) => self.client.businesses_by_category(category).await?,
            None => self.client.list_businesses().await?,
        };
        Ok(convert_all(rows))
    }

    async fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Alternative>> {
        let rows = self.client.businesses_by_tag(tag.trim()).await?;
        Ok(convert_all(rows))
    }

    async fn fetch_by_subcategory(&self, name: &str) -> Result<Vec<Alternative>> {
        let rows = self.client.businesses_by_subcategory(name.trim()).await?;
        Ok(convert_all(rows))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Alternative> {
        let row = self.client.business(id).await?;
        record_to_alternative(row).ok_or_else(|| crate::Error::NotFound(id.to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<Alternative>> {
        let rows = self.client.search_businesses(query).await?;
        Ok(convert_all(rows))
    }

    async fn fetch_page(&self, page: u32, category: Option<String>) -> Result<Vec<Alternative>> {
        let category = category.as_deref().and_then(normalize_category);
        let rows = self
            .client
            .businesses_page(page.max(1), self.page_size, category)
            .await?;
        Ok(convert_all(rows))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let rows = self.client.list_categories().await?;
        Ok(rows.into_iter().map(record_to_category).collect())
    }
}

fn convert_all(rows: Vec<BusinessRecord>) -> Vec<Alternative> {
    rows.into_iter().filter_map(record_to_alternative).collect()
}

/// Convert a backend row to our listing model
///
/// Rows with a pricing value outside the known set are dropped (and logged)
/// rather than guessed at. A missing platform list becomes `["Web"]` since
/// every listing has at least a website.
fn record_to_alternative(row: BusinessRecord) -> Option<Alternative> {
    let pricing = match row.pricing.as_deref().map(str::parse::<Pricing>) {
        Some(Ok(p)) => p,
        None => Pricing::Free,
        Some(Err(e)) => {
            warn!("Skipping business {}: {}", row.id, e);
            return None;
        }
    };

    let platform = match row.platform {
        Some(p) if !p.is_empty() => p,
        _ => vec!["Web".to_string()],
    };

    Some(Alternative {
        id: row.id,
        name: row.name,
        description: row.description.unwrap_or_default(),
        category: row.category.unwrap_or_default(),
        subcategory: row.subcategory.filter(|s| !s.trim().is_empty()),
        tags: row.tags.unwrap_or_default(),
        platform,
        pricing,
        likes: row.likes.unwrap_or(0).clamp(0, u32::MAX as i64) as u32,
        image_url: row.image_url.unwrap_or_default(),
        url: row.url.unwrap_or_default(),
        available_pincodes: row.available_pincodes,
        price: row.price.filter(|p| *p >= 0.0),
        rating: row.rating,
        features: row.features.unwrap_or_default(),
        franchise: None,
        news: Vec::new(),
        products: Vec::new(),
        services: Vec::new(),
    })
}

fn record_to_category(row: CategoryRecord) -> Category {
    let icon = row
        .icon
        .as_deref()
        .and_then(|token| token.parse::<CategoryIcon>().ok())
        .unwrap_or(CategoryIcon::Grid);

    Category {
        id: row.id,
        name: row.name,
        icon,
        count: row.count.unwrap_or(0).clamp(0, u32::MAX as i64) as u32,
    }
}
