use meetup_archiver::components::output::{read_archive, render_html};
use meetup_archiver::error::Error;
use meetup_archiver::startup;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Re-render an existing archive JSON file as a static HTML report,
/// without touching the remote API.
#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let mut args = env::args().skip(1);
    let input = args.next().ok_or_else(|| {
        Error::Environment("Usage: render_archive <archive.json> [output.html]".to_string())
    })?;
    let input = PathBuf::from(input);

    let output = match args.next() {
        Some(path) => PathBuf::from(path),
        None => input.with_extension("html"),
    };

    let document = read_archive(&input)?;
    info!(
        group = %document.group_name,
        events = document.events.len(),
        "Rendering archive"
    );

    let html = render_html(&document);
    fs::write(&output, html).map_err(Error::from)?;

    println!("Report written to {}", output.display());
    Ok(())
}
