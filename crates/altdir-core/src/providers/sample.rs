// Bundled sample catalog - what users see when the backend is down or empty
use async_trait::async_trait;

use crate::{
    models::{recount, Alternative, Category, CategoryIcon, FranchiseInfo, Pricing},
    provider::{normalize_category, DataProvider},
    search::SearchMatcher,
    Error, Result,
};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Fixed in-memory listings, served with the same contract as the backend
#[derive(Debug, Clone)]
pub struct SampleCatalog {
    items: Vec<Alternative>,
    categories: Vec<Category>,
    page_size: u32,
}

impl SampleCatalog {
    pub fn new() -> Self {
        Self::from_items(sample_alternatives())
    }

    /// Build a catalog around arbitrary items; categories are derived from them
    pub fn from_items(items: Vec<Alternative>) -> Self {
        let mut categories = sample_categories();
        for item in &items {
            if !categories.iter().any(|c| c.name == item.category) {
                categories.push(Category {
                    id: format!("cat-{}", categories.len() + 1),
                    name: item.category.clone(),
                    icon: CategoryIcon::Grid,
                    count: 0,
                });
            }
        }
        recount(&mut categories, &items);

        Self {
            items,
            categories,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn items(&self) -> &[Alternative] {
        &self.items
    }

    fn in_category(&self, category: Option<&str>) -> Vec<Alternative> {
        match category {
            None => self.items.clone(),
            Some(name) => self
                .items
                .iter()
                .filter(|a| a.category.eq_ignore_ascii_case(name))
                .cloned()
                .collect(),
        }
    }
}

impl Default for SampleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for SampleCatalog {
    async fn fetch_all(&self) -> Result<Vec<Alternative>> {
        Ok(self.items.clone())
    }

    async fn fetch_by_category(&self, name: &str) -> Result<Vec<Alternative>> {
        Ok(self.in_category(normalize_category(name)))
    }

    async fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Alternative>> {
        let tag = tag.trim();
        Ok(self
            .items
            .iter()
            .filter(|a| a.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .cloned()
            .collect())
    }

    async fn fetch_by_subcategory(&self, name: &str) -> Result<Vec<Alternative>> {
        let name = name.trim();
        Ok(self
            .items
            .iter()
            .filter(|a| {
                a.subcategory
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Alternative> {
        self.items
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<Alternative>> {
        Ok(SearchMatcher::filter(&self.items, query))
    }

    async fn fetch_page(&self, page: u32, category: Option<String>) -> Result<Vec<Alternative>> {
        let pool = self.in_category(category.as_deref().and_then(normalize_category));
        let size = self.page_size as usize;
        let start = (page.max(1) as usize - 1) * size;

        Ok(pool.into_iter().skip(start).take(size).collect())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }
}

fn listing(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    platform: &[&str],
    pricing: Pricing,
) -> Alternative {
    Alternative {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        subcategory: None,
        tags: Vec::new(),
        platform: platform.iter().map(|p| p.to_string()).collect(),
        pricing,
        likes: 0,
        image_url: format!("https://picsum.photos/seed/{}/400/300", id),
        url: String::new(),
        available_pincodes: None,
        price: None,
        rating: None,
        features: Vec::new(),
        franchise: None,
        news: Vec::new(),
        products: Vec::new(),
        services: Vec::new(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn sample_categories() -> Vec<Category> {
    [
        ("cat-1", "Food Delivery", CategoryIcon::Utensils),
        ("cat-2", "Streaming", CategoryIcon::Film),
        ("cat-3", "Shopping", CategoryIcon::ShoppingBag),
        ("cat-4", "Transport", CategoryIcon::Car),
        ("cat-5", "Health", CategoryIcon::Heart),
        ("cat-6", "Education", CategoryIcon::Book),
        ("cat-7", "Music", CategoryIcon::Music),
    ]
    .into_iter()
    .map(|(id, name, icon)| Category {
        id: id.to_string(),
        name: name.to_string(),
        icon,
        count: 0,
    })
    .collect()
}

/// The sample listings shipped with the app
pub fn sample_alternatives() -> Vec<Alternative> {
    let mut items = Vec::new();

    let mut a = listing(
        "1",
        "Swiggy",
        "Order food from restaurants near you with live order tracking",
        "Food Delivery",
        &["Web", "iOS", "Android"],
        Pricing::Free,
    );
    a.tags = strings(&["food", "delivery", "restaurants"]);
    a.features = strings(&["Live Tracking", "Scheduled Orders"]);
    a.likes = 342;
    a.rating = Some(4.3);
    a.url = "https://www.swiggy.com".into();
    a.available_pincodes = Some(strings(&["560001", "560002", "110001", "400001"]));
    a.franchise = Some(FranchiseInfo {
        available: false,
        investment_range: None,
        contact_email: None,
    });
    items.push(a);

    let mut a = listing(
        "2",
        "Zomato",
        "Discover restaurants, read reviews and get food delivered",
        "Food Delivery",
        &["Web", "iOS", "Android"],
        Pricing::Freemium,
    );
    a.tags = strings(&["food", "delivery", "reviews"]);
    a.features = strings(&["Live Tracking", "Table Booking"]);
    a.likes = 298;
    a.rating = Some(4.1);
    a.price = Some(149.0);
    a.url = "https://www.zomato.com".into();
    a.available_pincodes = Some(strings(&["560001", "110001"]));
    items.push(a);

    let mut a = listing(
        "3",
        "Local Tiffin Co",
        "Home-style meals delivered daily on a weekly plan",
        "Food Delivery",
        &["Web"],
        Pricing::Subscription,
    );
    a.subcategory = Some("Meal Plans".into());
    a.tags = strings(&["food", "homemade", "tiffin"]);
    a.likes = 57;
    a.price = Some(1200.0);
    a.available_pincodes = Some(strings(&["560002"]));
    a.franchise = Some(FranchiseInfo {
        available: true,
        investment_range: Some("5-10 lakh".into()),
        contact_email: Some("franchise@localtiffin.example".into()),
    });
    items.push(a);

    let mut a = listing(
        "4",
        "Netflix",
        "Stream movies, series and documentaries",
        "Streaming",
        &["Web", "iOS", "Android"],
        Pricing::Subscription,
    );
    a.tags = strings(&["movies", "series", "entertainment"]);
    a.features = strings(&["Offline Downloads", "4K"]);
    a.likes = 512;
    a.rating = Some(4.6);
    a.price = Some(499.0);
    a.url = "https://www.netflix.com".into();
    items.push(a);

    let mut a = listing(
        "5",
        "JioCinema",
        "Live sports, movies and originals",
        "Streaming",
        &["Web", "Android"],
        Pricing::Freemium,
    );
    a.tags = strings(&["sports", "movies", "entertainment"]);
    a.features = strings(&["Live Sports"]);
    a.likes = 265;
    a.rating = Some(3.9);
    a.price = Some(29.0);
    items.push(a);

    let mut a = listing(
        "6",
        "Jellyfin",
        "Self-hosted media server for your own movie collection",
        "Streaming",
        &["Web", "Android", "iOS"],
        Pricing::OpenSource,
    );
    a.subcategory = Some("Self-hosted".into());
    a.tags = strings(&["movies", "self-hosted", "privacy"]);
    a.features = strings(&["Offline Downloads"]);
    a.likes = 188;
    a.rating = Some(4.4);
    a.price = Some(0.0);
    a.url = "https://jellyfin.org".into();
    items.push(a);

    let mut a = listing(
        "7",
        "Meesho",
        "Budget shopping for fashion and home goods",
        "Shopping",
        &["Android", "iOS"],
        Pricing::Free,
    );
    a.tags = strings(&["fashion", "budget", "home"]);
    a.features = strings(&["Cash on Delivery"]);
    a.likes = 140;
    a.rating = Some(4.0);
    a.available_pincodes = Some(strings(&["560001", "400001", "700001"]));
    items.push(a);

    let mut a = listing(
        "8",
        "Neighbourhood Kirana",
        "Order groceries from your local kirana store",
        "Shopping",
        &["Web"],
        Pricing::Free,
    );
    a.subcategory = Some("Groceries".into());
    a.tags = strings(&["groceries", "local"]);
    a.likes = 33;
    a.available_pincodes = Some(Vec::new());
    items.push(a);

    let mut a = listing(
        "9",
        "Rapido",
        "Bike taxis and auto rides at low fares",
        "Transport",
        &["Android", "iOS"],
        Pricing::Paid,
    );
    a.tags = strings(&["rides", "bike-taxi"]);
    a.features = strings(&["Live Tracking"]);
    a.likes = 120;
    a.rating = Some(4.2);
    a.price = Some(35.0);
    a.available_pincodes = Some(strings(&["560001", "560002", "500001"]));
    items.push(a);

    let mut a = listing(
        "10",
        "Namma Yatri",
        "Driver-first auto booking with zero commission",
        "Transport",
        &["Android"],
        Pricing::OpenSource,
    );
    a.tags = strings(&["rides", "auto", "open-mobility"]);
    a.likes = 96;
    a.rating = Some(4.5);
    a.available_pincodes = Some(strings(&["560001", "560002"]));
    items.push(a);

    let mut a = listing(
        "11",
        "Practo",
        "Book doctor appointments and online consultations",
        "Health",
        &["Web", "iOS", "Android"],
        Pricing::Freemium,
    );
    a.tags = strings(&["doctors", "consultation"]);
    a.features = strings(&["Video Consultation"]);
    a.likes = 77;
    a.rating = Some(4.0);
    a.price = Some(299.0);
    items.push(a);

    let mut a = listing(
        "12",
        "Khan Academy",
        "Free lessons in maths, science and more",
        "Education",
        &["Web", "iOS", "Android"],
        Pricing::Free,
    );
    a.tags = strings(&["learning", "maths", "science"]);
    a.features = strings(&["Offline Downloads"]);
    a.likes = 410;
    a.rating = Some(4.8);
    a.price = Some(0.0);
    items.push(a);

    let mut a = listing(
        "13",
        "Unacademy",
        "Live classes for competitive exam preparation",
        "Education",
        &["Web", "Android"],
        Pricing::Subscription,
    );
    a.tags = strings(&["learning", "exams"]);
    a.features = strings(&["Live Classes"]);
    a.likes = 154;
    a.rating = Some(3.8);
    a.price = Some(999.0);
    items.push(a);

    let mut a = listing(
        "14",
        "Funkwhale",
        "Federated platform to listen to and share music",
        "Music",
        &["Web"],
        Pricing::OpenSource,
    );
    a.tags = strings(&["music", "self-hosted", "privacy"]);
    a.likes = 45;
    a.rating = Some(4.2);
    items.push(a);

    items
}
