// The listing grid's view model: paged items, narrowed and ordered
use std::sync::Arc;

use crate::{
    filter::{FilterEngine, FilterSettings, SortBy},
    models::Alternative,
    paginator::{LoadOutcome, Paginator},
    provider::DataProvider,
};

pub struct Listing {
    paginator: Paginator,
    filters: FilterSettings,
    sort_by: SortBy,
}

impl Listing {
    pub fn new(provider: Arc<dyn DataProvider>, page_size: u32) -> Self {
        Self {
            paginator: Paginator::new(provider, page_size),
            filters: FilterSettings::default(),
            sort_by: SortBy::default(),
        }
    }

    pub fn filters(&self) -> &FilterSettings {
        &self.filters
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Swap the active filters; a different category restarts paging
    ///
    /// Returns true when the paginator was reset.
    pub fn set_filters(&mut self, filters: FilterSettings) -> bool {
        let category = filters.primary_category();
        self.filters = filters;
        self.paginator.set_category(category)
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.paginator.load_more().await
    }

    /// What the grid should show right now
    pub fn visible(&self) -> Vec<Alternative> {
        let mut items = FilterEngine::apply(&self.paginator.items(), &self.filters);
        FilterEngine::sort(&mut items, self.sort_by);
        items
    }
}
