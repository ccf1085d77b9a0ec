use std::path::PathBuf;
use std::sync::Arc;

use altdir_cache::KeyValueStore;
use altdir_core::{
    models::recount, Config, DataProvider, DebouncedSearch, Listing, LoadOutcome, PincodeStore,
    PresetStore,
};
use tracing::{info, warn};

use crate::args::{parse_sort, Commands, ConfigAction, PincodeAction, PresetAction};
use crate::output;

pub struct Context {
    pub provider: Arc<dyn DataProvider>,
    pub store: Arc<dyn KeyValueStore>,
    pub config: Config,
    /// Set when `--config` pointed somewhere other than the default
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

pub async fn run(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List {
            filters,
            preset,
            sort,
            pages,
        } => {
            let base = match preset {
                Some(id) => PresetStore::new(Arc::clone(&ctx.store)).load(&id)?,
                None => Default::default(),
            };
            let settings = filters.merge_into(base)?;
            let sort_by = parse_sort(&sort)?;

            let mut listing = Listing::new(Arc::clone(&ctx.provider), ctx.config.pagination.page_size);
            listing.set_filters(settings);
            listing.set_sort(sort_by);

            for _ in 0..pages.max(1) {
                match listing.load_more().await {
                    LoadOutcome::Loaded { has_more: true, .. } => {}
                    LoadOutcome::Failed(reason) => {
                        warn!("Stopped paging: {}", reason);
                        break;
                    }
                    _ => break,
                }
            }

            let visible = listing.visible();
            info!(
                "{} of {} loaded listings match (page {})",
                visible.len(),
                listing.paginator().len(),
                listing.paginator().current_page()
            );
            output::listings(&visible, ctx.json)?;
            if !ctx.json && listing.paginator().has_more() {
                println!("(more available - use --pages to load further)");
            }
        }
        Commands::Search { query, ranked } => {
            let search = DebouncedSearch::new(Arc::clone(&ctx.provider), ctx.config.search.debounce())
                .ranked(ranked || ctx.config.search.ranked);
            let outcome = search.submit(&query).await;

            if let Some(notice) = &outcome.notice {
                eprintln!("{}", notice);
            }
            output::listings(&outcome.results, ctx.json)?;
        }
        Commands::Show { id } => match ctx.provider.fetch_by_id(&id).await {
            Ok(item) => output::detail(&item, ctx.json)?,
            Err(e) if e.is_not_found() => {
                eprintln!("No listing with id '{}'", id);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Categories => {
            let (categories, items) =
                tokio::join!(ctx.provider.fetch_categories(), ctx.provider.fetch_all());
            let mut categories = categories?;
            recount(&mut categories, &items?);
            output::categories(&categories, ctx.json)?;
        }
        Commands::Preset { action } => run_preset(ctx, action)?,
        Commands::Pincode { action } => run_pincode(ctx, action)?,
        Commands::Config { action } => run_config(ctx, action)?,
    }

    Ok(())
}

fn run_preset(ctx: &Context, action: PresetAction) -> anyhow::Result<()> {
    let presets = PresetStore::new(Arc::clone(&ctx.store));

    match action {
        PresetAction::Save { name, filters } => {
            let preset = presets.save(&name, &filters.to_settings()?)?;
            output::presets(std::slice::from_ref(&preset), ctx.json)?;
        }
        PresetAction::List => output::presets(&presets.list()?, ctx.json)?,
        PresetAction::Show { id } => {
            let preset = presets.get(&id)?;
            output::json_or(&preset, ctx.json, || {
                println!("{} ({})", preset.name, preset.id);
                println!("{}", serde_json::to_string_pretty(&preset.filters).unwrap_or_default());
            })?;
        }
        PresetAction::Delete { id } => {
            presets.delete(&id)?;
            if !ctx.json {
                println!("Deleted {}", id);
            }
        }
    }

    Ok(())
}

fn run_pincode(ctx: &Context, action: PincodeAction) -> anyhow::Result<()> {
    let pins = PincodeStore::new(Arc::clone(&ctx.store));

    match action {
        PincodeAction::Set { pincode } => {
            let saved = pins.set(&pincode)?;
            println!("Pincode set to {}", saved);
        }
        PincodeAction::Show => match pins.get()? {
            Some(pincode) => println!("{}", pincode),
            None => println!("No pincode set"),
        },
        PincodeAction::Clear => {
            pins.clear()?;
            println!("Pincode cleared");
        }
    }

    Ok(())
}

fn run_config(ctx: &Context, action: ConfigAction) -> anyhow::Result<()> {
    let path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    match action {
        ConfigAction::Show => {
            let text = ctx.config.to_toml()?;
            output::json_or(&ctx.config, ctx.json, || print!("{}", text))?;
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ctx.config.save_to(&path)?;
            info!("Wrote config to {}", path.display());
            if !ctx.json {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}
