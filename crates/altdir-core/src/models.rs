use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A listed business, service or app
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Web, iOS, Android, ... never empty
    #[serde(deserialize_with = "non_empty_platforms")]
    pub platform: Vec<String>,
    pub pricing: Pricing,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub url: String,
    /// `None` means available everywhere, an empty list means nowhere
    #[serde(default)]
    pub available_pincodes: Option<Vec<String>>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchise: Option<FranchiseInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Offering>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Offering>,
}

impl Alternative {
    pub fn is_available_at(&self, pincode: &str) -> bool {
        match &self.available_pincodes {
            None => true,
            Some(codes) => codes.iter().any(|c| c == pincode),
        }
    }
}

fn non_empty_platforms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let platforms = Vec::<String>::deserialize(deserializer)?;
    if platforms.iter().all(|p| p.trim().is_empty()) {
        return Err(serde::de::Error::custom("a listing needs at least one platform"));
    }
    Ok(platforms)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseInfo {
    pub available: bool,
    #[serde(default)]
    pub investment_range: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// A product or a service on a listing's detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offering {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// How a listing charges
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
    Subscription,
    #[serde(rename = "Open Source")]
    OpenSource,
}

impl Pricing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pricing::Free => "Free",
            Pricing::Freemium => "Freemium",
            Pricing::Paid => "Paid",
            Pricing::Subscription => "Subscription",
            Pricing::OpenSource => "Open Source",
        }
    }
}

impl std::fmt::Display for Pricing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Pricing {
    type Err = crate::Error;

    /// Accepts the display names plus the lowercase/dashed spellings the backend uses
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "free" => Ok(Pricing::Free),
            "freemium" => Ok(Pricing::Freemium),
            "paid" => Ok(Pricing::Paid),
            "subscription" => Ok(Pricing::Subscription),
            "opensource" => Ok(Pricing::OpenSource),
            _ => Err(crate::Error::Validation(format!("unknown pricing model '{}'", s))),
        }
    }
}

/// A directory category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: CategoryIcon,
    /// Informational only, see `count_by_category` for the real numbers
    #[serde(default)]
    pub count: u32,
}

/// Icons a category can carry - a closed set, unknown tokens are rejected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryIcon {
    Utensils,
    Film,
    ShoppingBag,
    Car,
    Heart,
    Book,
    Music,
    Home,
    Briefcase,
    Plane,
    Dumbbell,
    Gamepad,
    Smartphone,
    Grid,
}

impl CategoryIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryIcon::Utensils => "utensils",
            CategoryIcon::Film => "film",
            CategoryIcon::ShoppingBag => "shopping-bag",
            CategoryIcon::Car => "car",
            CategoryIcon::Heart => "heart",
            CategoryIcon::Book => "book",
            CategoryIcon::Music => "music",
            CategoryIcon::Home => "home",
            CategoryIcon::Briefcase => "briefcase",
            CategoryIcon::Plane => "plane",
            CategoryIcon::Dumbbell => "dumbbell",
            CategoryIcon::Gamepad => "gamepad",
            CategoryIcon::Smartphone => "smartphone",
            CategoryIcon::Grid => "grid",
        }
    }
}

impl std::str::FromStr for CategoryIcon {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
            .map_err(|_| crate::Error::Validation(format!("unknown category icon '{}'", s)))
    }
}

/// Count listings per category name, from the listings themselves
pub fn count_by_category(items: &[Alternative]) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Overwrite the informational counts with what `items` actually holds
pub fn recount(categories: &mut [Category], items: &[Alternative]) {
    let counts = count_by_category(items);
    for category in categories.iter_mut() {
        category.count = counts.get(&category.name).copied().unwrap_or(0);
    }
}
