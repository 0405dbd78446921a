use anyhow::{Context, Result};
use locale_router::{config::Config, i18n::LocaleRegistry, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_router=info".parse()?),
        )
        .init();

    info!("Starting locale router");

    // Refuse to serve with inconsistent locale tables
    LocaleRegistry::get()
        .validate()
        .context("Locale tables failed validation")?;

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Serving {} locales for {} (territory header: {})",
        LocaleRegistry::get().list_all().len(),
        config.site_base_url,
        config.territory_header
    );

    server::serve(config).await
}
