//! Product Catalog Client - Main Entry Point
//!
//! Usage: `product-catalog [CONFIG_PATH]`

use std::path::Path;

use product_catalog::domain::config::AppConfig;
use product_catalog::services::HttpBackend;
use product_catalog::state::Catalog;
use product_catalog::utils::logging::init_logging;
use product_catalog::views::ConsoleView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from(Path::new(&path))?,
        None => AppConfig::try_load()?,
    };

    // Initialize tracing for logging
    let _log_guard = init_logging(&config.log)?;

    tracing::info!(base_url = %config.backend.base_url, "Starting product catalog client...");

    let backend = HttpBackend::new(&config.backend)?;
    let catalog = Catalog::new(backend, config.catalog.page_size)?;

    ConsoleView::new(catalog).run().await?;
    Ok(())
}
