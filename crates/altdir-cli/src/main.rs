use std::path::PathBuf;
use std::sync::Arc;

use altdir_cache::{KeyValueStore, MemoryStore, SqliteStore};
use altdir_core::Config;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod commands;
mod output;

use args::Commands;

#[derive(Parser)]
#[command(name = "altdir")]
#[command(version, about = "Browse, search and filter the alternatives directory", long_about = None)]
struct Cli {
    /// Backend URL (overrides config file and ALTDIR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Only use the bundled sample data
    #[arg(long, global = true)]
    offline: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Keep presets and pincode in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "altdir=info,altdir_core=warn,altdir_api=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone();
    let mut config = match &config_path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    if let Some(url) = cli.api_url.clone() {
        config.remote.base_url = Some(url);
    }

    let Some(command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    let ctx = commands::Context {
        provider: altdir_core::build_provider(&config, cli.offline)?,
        store: open_store(&config, cli.ephemeral)?,
        config,
        config_path,
        json: cli.json,
    };

    commands::run(&ctx, command).await
}

fn open_store(config: &Config, ephemeral: bool) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if ephemeral {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = config.storage.resolved_path()?;
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening local store at {}", path.display()))?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_flags_parse() {
        let cli = Cli::parse_from([
            "altdir", "--offline", "list", "--category", "Streaming", "--platform", "iOS",
            "--pricing", "open-source", "--pincode", "560001", "--sort", "likes",
        ]);
        assert!(cli.offline);
        match cli.command {
            Some(Commands::List { filters, .. }) => {
                let settings = filters.to_settings().unwrap();
                assert_eq!(settings.categories, vec!["Streaming".to_string()]);
                assert_eq!(settings.location, "560001");
                assert_eq!(settings.pricing_models, vec![altdir_core::Pricing::OpenSource]);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_config_init_parses() {
        let cli = Cli::parse_from([
            "altdir", "--config", "/tmp/altdir.toml", "config", "init", "--force",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/altdir.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: crate::args::ConfigAction::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_bad_pricing_is_reported() {
        let filters = FilterArgs {
            pricing: vec!["lifetime".into()],
            ..FilterArgs::default()
        };
        assert!(filters.to_settings().is_err());
    }
}
