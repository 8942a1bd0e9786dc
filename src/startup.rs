use crate::components::api::GraphqlClient;
use crate::components::archive::models::GroupArchive;
use crate::components::archive::{embed_images, fetch_all_group_events, ArchiveDocument};
use crate::components::output::write_archive;
use crate::config::Config;
use crate::error::Error;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Environment(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run one full archive pass: probe credentials, fetch and merge both event
/// categories, inline images, write the JSON document. Returns the output path.
pub async fn run_archive(config: &Config, urlname: &str) -> miette::Result<PathBuf> {
    let client = GraphqlClient::new(config)?;

    info!("Verifying API credentials");
    client.probe_auth().await?;

    let archive = fetch_all_group_events(
        &client,
        urlname,
        config.page_size,
        &config.excluded_host,
    )
    .await?;

    if archive.events.is_empty() {
        info!("No events found for group {}", urlname);
    }

    info!(events = archive.events.len(), "Embedding event images");
    let events = embed_images(&client, archive.events).await;
    let archive = GroupArchive { events, ..archive };

    let document = ArchiveDocument::new(urlname, archive);
    let path = PathBuf::from(&config.output_dir).join(format!("{}-archive.json", urlname));
    write_archive(&path, &document)?;

    Ok(path)
}
