use altdir_core::{FilterSettings, PriceRange, Pricing, SortBy};

#[derive(clap::Subcommand)]
pub enum Commands {
    /// List listings, optionally filtered and sorted
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Start from a saved preset (flags are added on top)
        #[arg(long)]
        preset: Option<String>,

        /// likes, name, rating, price-asc, price-desc, relevance
        #[arg(long, default_value = "relevance")]
        sort: String,

        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Free-text search over names and descriptions
    Search {
        query: String,

        /// Order by fuzzy score
        #[arg(long)]
        ranked: bool,
    },
    /// Show one listing
    Show { id: String },
    /// List categories with their listing counts
    Categories,
    /// Manage saved filter presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Remember, show or forget your pincode
    Pincode {
        #[command(subcommand)]
        action: PincodeAction,
    },
    /// Inspect or write the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Print the settings in effect
    Show,
    /// Print where the config file lives
    Path,
    /// Write the settings in effect to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Subcommand)]
pub enum PresetAction {
    /// Save the given filters under a name
    Save {
        name: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    List,
    Show { id: String },
    Delete { id: String },
}

#[derive(clap::Subcommand)]
pub enum PincodeAction {
    Set { pincode: String },
    Show,
    Clear,
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct FilterArgs {
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long = "platform")]
    pub platforms: Vec<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long = "feature")]
    pub features: Vec<String>,

    #[arg(long)]
    pub pricing: Vec<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub min_rating: Option<f32>,

    /// Only listings available at this pincode
    #[arg(long)]
    pub pincode: Option<String>,
}

impl FilterArgs {
    pub fn to_settings(&self) -> altdir_core::Result<FilterSettings> {
        self.merge_into(FilterSettings::default())
    }

    /// Layer these flags over existing settings (e.g. a loaded preset)
    pub fn merge_into(&self, mut settings: FilterSettings) -> altdir_core::Result<FilterSettings> {
        settings.categories.extend(self.categories.iter().cloned());
        settings.platforms.extend(self.platforms.iter().cloned());
        settings.tags.extend(self.tags.iter().cloned());
        settings.features.extend(self.features.iter().cloned());

        for raw in &self.pricing {
            let pricing: Pricing = raw.parse()?;
            if !settings.pricing_models.contains(&pricing) {
                settings.pricing_models.push(pricing);
            }
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            settings.price_range = PriceRange::new(
                self.min_price.unwrap_or(settings.price_range.min),
                self.max_price.or(settings.price_range.max),
            );
        }
        if self.min_rating.is_some() {
            settings.min_rating = self.min_rating;
        }
        if let Some(pincode) = &self.pincode {
            settings.location = altdir_core::pincode::validate_pincode(pincode)?;
        }

        settings.validate()?;
        Ok(settings)
    }
}

pub fn parse_sort(raw: &str) -> altdir_core::Result<SortBy> {
    raw.parse()
}
