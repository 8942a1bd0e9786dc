use crate::components::archive::models::ArchiveDocument;
use crate::error::ArchiveResult;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize the archive document to a pretty JSON file
pub fn write_archive(path: &Path, document: &ArchiveDocument) -> ArchiveResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;

    info!(
        path = %path.display(),
        events = document.events.len(),
        "Wrote archive"
    );
    Ok(())
}

/// Read an archive document back from disk for re-rendering
pub fn read_archive(path: &Path) -> ArchiveResult<ArchiveDocument> {
    let content = fs::read_to_string(path)?;
    let document = serde_json::from_str(&content)?;
    Ok(document)
}
