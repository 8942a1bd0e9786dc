use meetup_archiver::error::Error;
use meetup_archiver::startup;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let urlname = env::args().nth(1).ok_or_else(|| {
        Error::Environment("Usage: meetup-archiver <group-urlname>".to_string())
    })?;

    info!("Starting archive run for {}", urlname);

    // Load configuration
    let config = startup::load_config()?;

    let path = startup::run_archive(&config, &urlname).await?;
    println!("Archive written to {}", path.display());

    Ok(())
}
