use crate::{
    models::{Alternative, Category},
    Result,
};

/// Where listings come from
///
/// The remote backend and the bundled sample catalog both implement this,
/// and `FallbackProvider` stitches them together. Keeping it a trait also
/// means tests can hand the pipeline whatever data they like.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Alternative>>;

    /// "All" or an empty name means every category
    async fn fetch_by_category(&self, name: &str) -> Result<Vec<Alternative>>;

    async fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Alternative>>;

    async fn fetch_by_subcategory(&self, name: &str) -> Result<Vec<Alternative>>;

    /// `Error::NotFound` when the id is unknown
    async fn fetch_by_id(&self, id: &str) -> Result<Alternative>;

    async fn search(&self, query: &str) -> Result<Vec<Alternative>>;

    /// Pages are numbered from 1
    async fn fetch_page(&self, page: u32, category: Option<String>) -> Result<Vec<Alternative>>;

    async fn fetch_categories(&self) -> Result<Vec<Category>>;
}

/// Treat "All" and blank category names as no category at all
pub fn normalize_category(name: &str) -> Option<&str> {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case(crate::filter::ALL_CATEGORIES) {
        None
    } else {
        Some(name)
    }
}
