// Provider implementations: the backend, the bundled sample data, and the two layered
pub mod layered;
pub mod remote;
pub mod sample;

pub use layered::FallbackProvider;
pub use remote::RemoteProvider;
pub use sample::SampleCatalog;

use std::sync::Arc;

use altdir_api::{DirectoryClient, RetryConfig};
use tracing::info;

use crate::{config::Config, provider::DataProvider, Result};

/// Wire up the provider stack a config describes
///
/// With a backend URL (and not `offline`) that's the remote source with the
/// sample catalog behind it; otherwise just the sample catalog.
pub fn build_provider(config: &Config, offline: bool) -> Result<Arc<dyn DataProvider>> {
    let page_size = config.pagination.page_size;
    let sample = SampleCatalog::new().with_page_size(page_size);

    let base_url = match (&config.remote.base_url, offline) {
        (Some(url), false) => url,
        _ => {
            info!("No backend configured, serving sample data only");
            return Ok(Arc::new(sample));
        }
    };

    let retry = RetryConfig {
        max_retries: config.remote.retries,
        ..RetryConfig::default()
    };
    let client = DirectoryClient::with_timeout(
        base_url.as_str(),
        config.remote.api_key.clone(),
        config.remote.timeout(),
    )?
    .with_retry_config(retry);

    info!("Using backend at {}", base_url);
    let remote = RemoteProvider::new(client).with_page_size(page_size);
    Ok(Arc::new(FallbackProvider::new(Box::new(remote), sample)))
}
