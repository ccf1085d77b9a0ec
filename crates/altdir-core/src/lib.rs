// Browse pipeline for the alternatives directory: fetch, filter, search, page
pub mod config;
pub mod debounce;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod listing;
pub mod models;
pub mod paginator;
pub mod pincode;
pub mod presets;
pub mod provider;
pub mod providers;
pub mod search;

pub use config::Config;
pub use debounce::{Debouncer, Generation};
pub use error::Error;
pub use filter::{FilterEngine, FilterSettings, PriceRange, SortBy};
pub use listing::Listing;
pub use models::{Alternative, Category, CategoryIcon, Pricing};
pub use paginator::{LoadOutcome, PageState, Paginator};
pub use pincode::PincodeStore;
pub use presets::{FilterPreset, PresetStore};
pub use provider::DataProvider;
pub use providers::{build_provider, FallbackProvider, RemoteProvider, SampleCatalog};
pub use search::{DebouncedSearch, SearchMatcher, SearchOutcome};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
