// Filter engine - narrows a candidate list down to what the user asked for
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Alternative, Pricing};

/// Category value meaning "don't filter by category"
pub const ALL_CATEGORIES: &str = "All";

/// Inclusive price bounds; `max: None` means no upper bound
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0.0, max: None }
    }
}

impl PriceRange {
    pub fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_constrained(&self) -> bool {
        self.min > 0.0 || self.max.is_some()
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

/// Everything the filter sidebar can express
///
/// Every dimension defaults to "no constraint": empty sets, empty location,
/// an unbounded price range and no rating threshold.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FilterSettings {
    pub price_range: PriceRange,
    pub min_rating: Option<f32>,
    pub platforms: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub pricing_models: Vec<Pricing>,
    /// Pincode the listing must be available at
    pub location: String,
}

impl FilterSettings {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platforms.push(platform.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing_models.push(pricing);
        self
    }

    pub fn with_location(mut self, pincode: impl Into<String>) -> Self {
        self.location = pincode.into();
        self
    }

    /// True when no dimension constrains anything
    pub fn is_empty(&self) -> bool {
        self.active_categories().is_empty()
            && active_values(&self.platforms).is_empty()
            && active_values(&self.tags).is_empty()
            && active_values(&self.features).is_empty()
            && self.pricing_models.is_empty()
            && !self.price_range.is_constrained()
            && self.rating_threshold().is_none()
            && self.location.trim().is_empty()
    }

    /// Categories that actually constrain - "All" and blanks don't
    pub fn active_categories(&self) -> Vec<&str> {
        active_values(&self.categories)
            .into_iter()
            .filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES))
            .collect()
    }

    /// The single category a paginated fetch can be narrowed to, if any
    pub fn primary_category(&self) -> Option<String> {
        match self.active_categories().as_slice() {
            [only] => Some((*only).to_string()),
            _ => None,
        }
    }

    fn rating_threshold(&self) -> Option<f32> {
        self.min_rating.filter(|r| *r > 0.0)
    }

    pub fn validate(&self) -> crate::Result<()> {
        let range = &self.price_range;
        if range.min < 0.0 || range.max.is_some_and(|max| max < 0.0) {
            return Err(crate::Error::Validation("price bounds must not be negative".into()));
        }
        if range.max.is_some_and(|max| max < range.min) {
            return Err(crate::Error::Validation(format!(
                "price range is reversed: {} > {}",
                range.min,
                range.max.unwrap_or_default()
            )));
        }
        if self.min_rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
            return Err(crate::Error::Validation("rating threshold must be between 0 and 5".into()));
        }
        Ok(())
    }
}

/// Result ordering options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Keep whatever order the source gave us
    #[default]
    Relevance,
    Likes,
    Name,
    PriceLowToHigh,
    PriceHighToLow,
    Rating,
}

impl std::str::FromStr for SortBy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortBy::Relevance),
            "likes" | "popular" => Ok(SortBy::Likes),
            "name" => Ok(SortBy::Name),
            "price-low-to-high" | "price-asc" => Ok(SortBy::PriceLowToHigh),
            "price-high-to-low" | "price-desc" => Ok(SortBy::PriceHighToLow),
            "rating" => Ok(SortBy::Rating),
            other => Err(crate::Error::Validation(format!("unknown sort order '{}'", other))),
        }
    }
}

/// Stateless predicate pipeline over listings
pub struct FilterEngine;

impl FilterEngine {
    /// Keep the candidates that pass every active filter, in their original order
    pub fn apply(candidates: &[Alternative], filters: &FilterSettings) -> Vec<Alternative> {
        if filters.is_empty() {
            return candidates.to_vec();
        }

        candidates
            .iter()
            .filter(|item| Self::matches(item, filters))
            .cloned()
            .collect()
    }

    /// Each check passes trivially when its dimension is empty
    pub fn matches(item: &Alternative, filters: &FilterSettings) -> bool {
        Self::category_matches(item, filters)
            && any_overlap(&item.platform, &filters.platforms)
            && Self::pricing_matches(item, filters)
            && any_overlap(&item.tags, &filters.tags)
            && Self::price_matches(item, filters)
            && Self::rating_matches(item, filters)
            && any_overlap(&item.features, &filters.features)
            && Self::location_matches(item, filters)
    }

    fn category_matches(item: &Alternative, filters: &FilterSettings) -> bool {
        let wanted = filters.active_categories();
        wanted.is_empty() || wanted.iter().any(|c| c.eq_ignore_ascii_case(&item.category))
    }

    fn pricing_matches(item: &Alternative, filters: &FilterSettings) -> bool {
        filters.pricing_models.is_empty() || filters.pricing_models.contains(&item.pricing)
    }

    fn price_matches(item: &Alternative, filters: &FilterSettings) -> bool {
        if !filters.price_range.is_constrained() {
            return true;
        }
        // Unpriced listings can't prove they fit a constrained range
        item.price.is_some_and(|p| filters.price_range.contains(p))
    }

    fn rating_matches(item: &Alternative, filters: &FilterSettings) -> bool {
        match filters.rating_threshold() {
            None => true,
            Some(min) => item.rating.is_some_and(|r| r >= min),
        }
    }

    fn location_matches(item: &Alternative, filters: &FilterSettings) -> bool {
        let pincode = filters.location.trim();
        pincode.is_empty() || item.is_available_at(pincode)
    }

    /// Stable sort, so ties keep their incoming order
    pub fn sort(items: &mut [Alternative], sort_by: SortBy) {
        match sort_by {
            SortBy::Relevance => {}
            SortBy::Likes => items.sort_by(|a, b| b.likes.cmp(&a.likes)),
            SortBy::Name => items.sort_by_key(|a| a.name.to_lowercase()),
            SortBy::PriceLowToHigh => items.sort_by(|a, b| cmp_missing_last(a.price, b.price, false)),
            SortBy::PriceHighToLow => items.sort_by(|a, b| cmp_missing_last(a.price, b.price, true)),
            SortBy::Rating => items.sort_by(|a, b| {
                cmp_missing_last(a.rating.map(f64::from), b.rating.map(f64::from), true)
            }),
        }
    }
}

/// Trimmed entries of a set-valued dimension, blanks dropped
fn active_values(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
}

/// No non-blank `wanted` entry means no constraint; otherwise one shared value is enough
fn any_overlap(have: &[String], wanted: &[String]) -> bool {
    let wanted = active_values(wanted);
    wanted.is_empty()
        || wanted
            .iter()
            .any(|w| have.iter().any(|h| h.eq_ignore_ascii_case(w)))
}

fn cmp_missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alt(id: &str, category: &str, platform: &[&str], pricing: Pricing) -> Alternative {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Listing {}", id),
            "description": "",
            "category": category,
            "platform": platform,
            "pricing": pricing,
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Alternative> {
        let mut a = alt("1", "Food Delivery", &["Web"], Pricing::Paid);
        a.tags = vec!["food".into(), "fast".into()];
        a.price = Some(199.0);
        a.rating = Some(4.1);
        a.features = vec!["Live Tracking".into()];
        a.available_pincodes = Some(vec!["560001".into(), "560002".into()]);
        a.likes = 5;

        let mut b = alt("2", "Streaming", &["Web", "iOS"], Pricing::Subscription);
        b.tags = vec!["movies".into()];
        b.price = Some(499.0);
        b.rating = Some(4.7);
        b.likes = 50;

        let mut c = alt("3", "Streaming", &["Android"], Pricing::Free);
        c.available_pincodes = Some(vec![]);
        c.likes = 20;

        vec![a, b, c]
    }

    fn ids(items: &[Alternative]) -> Vec<&str> {
        items.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_default_filters_are_identity() {
        let items = catalog();
        assert!(FilterSettings::default().is_empty());
        assert_eq!(FilterEngine::apply(&items, &FilterSettings::default()), items);
    }

    #[test]
    fn test_each_empty_dimension_is_noop() {
        let items = catalog();
        let variants = vec![
            FilterSettings::default().with_category(""),
            FilterSettings::default().with_category("All"),
            FilterSettings {
                min_rating: Some(0.0),
                ..Default::default()
            },
            FilterSettings::default().with_location("   "),
            FilterSettings {
                price_range: PriceRange::new(0.0, None),
                ..Default::default()
            },
            FilterSettings::default().with_platform(""),
            FilterSettings::default().with_tag("  "),
            FilterSettings {
                features: vec!["".into()],
                ..Default::default()
            },
        ];

        for filters in variants {
            assert_eq!(FilterEngine::apply(&items, &filters), items, "{:?}", filters);
        }
    }

    #[test]
    fn test_blank_entries_ignored_beside_real_ones() {
        let items = catalog();
        let mixed = FilterSettings::default().with_platform(" ").with_platform("iOS");
        let plain = FilterSettings::default().with_platform("iOS");
        assert_eq!(FilterEngine::apply(&items, &mixed), FilterEngine::apply(&items, &plain));
        assert!(!mixed.is_empty());
        assert!(FilterSettings::default().with_tag("").is_empty());
    }

    #[test]
    fn test_category_scenario() {
        let candidates = vec![
            alt("a", "Food Delivery", &["Web"], Pricing::Paid),
            alt("b", "Streaming", &["Web", "iOS"], Pricing::Subscription),
        ];
        let filters = FilterSettings::default().with_category("Streaming");

        let result = FilterEngine::apply(&candidates, &filters);
        assert_eq!(ids(&result), vec!["b"]);
    }

    #[test]
    fn test_category_filter_yields_only_that_category() {
        let filters = FilterSettings::default().with_category("streaming");
        let result = FilterEngine::apply(&catalog(), &filters);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.category == "Streaming"));
    }

    #[test]
    fn test_platform_filter_requires_intersection() {
        let filters = FilterSettings::default().with_platform("iOS");
        let result = FilterEngine::apply(&catalog(), &filters);
        assert_eq!(ids(&result), vec!["2"]);
        assert!(result.iter().all(|a| a.platform.iter().any(|p| p == "iOS")));
    }

    #[test]
    fn test_pricing_and_tags() {
        let filters = FilterSettings::default()
            .with_pricing(Pricing::Free)
            .with_pricing(Pricing::Paid);
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["1", "3"]);

        let filters = FilterSettings::default().with_tag("movies").with_tag("fast");
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["1", "2"]);
    }

    #[test]
    fn test_price_range_excludes_unpriced_when_constrained() {
        let filters = FilterSettings {
            price_range: PriceRange::new(100.0, Some(300.0)),
            ..Default::default()
        };
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["1"]);
    }

    #[test]
    fn test_rating_and_features() {
        let filters = FilterSettings {
            min_rating: Some(4.5),
            ..Default::default()
        };
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["2"]);

        let filters = FilterSettings {
            features: vec!["live tracking".into()],
            ..Default::default()
        };
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["1"]);
    }

    #[test]
    fn test_pincode_policy() {
        // 1 lists 560001, 2 has no list (everywhere), 3 has an empty list (nowhere)
        let filters = FilterSettings::default().with_location("560001");
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["1", "2"]);

        let filters = FilterSettings::default().with_location("400001");
        assert_eq!(ids(&FilterEngine::apply(&catalog(), &filters)), vec!["2"]);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let items = catalog();
        let both = FilterSettings::default()
            .with_category("Streaming")
            .with_platform("Web");
        let step = FilterEngine::apply(
            &FilterEngine::apply(&items, &FilterSettings::default().with_platform("Web")),
            &FilterSettings::default().with_category("Streaming"),
        );
        assert_eq!(FilterEngine::apply(&items, &both), step);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let ok: Result<FilterSettings, _> =
            serde_json::from_str(r#"{"categories":["Streaming"],"pricingModels":["Open Source"]}"#);
        let ok = ok.unwrap();
        assert_eq!(ok.pricing_models, vec![Pricing::OpenSource]);
        assert!(ok.tags.is_empty());

        let bad: Result<FilterSettings, _> = serde_json::from_str(r#"{"colour":"red"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_validate_price_range() {
        let reversed = FilterSettings {
            price_range: PriceRange::new(500.0, Some(100.0)),
            ..Default::default()
        };
        assert!(matches!(reversed.validate(), Err(crate::Error::Validation(_))));

        let negative = FilterSettings {
            price_range: PriceRange::new(-1.0, None),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
        assert!(FilterSettings::default().validate().is_ok());
    }

    #[test]
    fn test_sorting() {
        let mut items = catalog();
        FilterEngine::sort(&mut items, SortBy::Likes);
        assert_eq!(ids(&items), vec!["2", "3", "1"]);

        FilterEngine::sort(&mut items, SortBy::PriceLowToHigh);
        assert_eq!(ids(&items), vec!["1", "2", "3"]);

        FilterEngine::sort(&mut items, SortBy::Rating);
        assert_eq!(ids(&items), vec!["2", "1", "3"]);

        assert_eq!("popular".parse::<SortBy>().unwrap(), SortBy::Likes);
    }

    #[test]
    fn test_primary_category() {
        assert_eq!(FilterSettings::default().primary_category(), None);
        assert_eq!(
            FilterSettings::default().with_category("All").with_category("Food").primary_category(),
            Some("Food".to_string())
        );
        assert_eq!(
            FilterSettings::default().with_category("A").with_category("B").primary_category(),
            None
        );
    }
}
