//! Best-effort image inlining for fetched events.
//!
//! Every download here is optional: a failure leaves the record in its
//! pre-enrichment form and is logged, never propagated. Records are enriched
//! as values and reassembled into a fresh list, so the stage can never drop,
//! duplicate or reorder anything.

use super::models::{EventPhoto, EventRecord};
use crate::error::ArchiveResult;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, warn};

/// Ceiling on photos downloaded per album, regardless of album size
pub const MAX_ALBUM_PHOTOS: usize = 20;

/// Records enriched concurrently. Order is preserved by the buffered stream;
/// photo work inside one record stays sequential so the image host sees
/// paced requests.
const ENRICH_CONCURRENCY: usize = 4;

/// Pause between consecutive photo downloads for one record
const PHOTO_PAUSE: Duration = Duration::from_millis(150);

/// Fixed image rendition requested from the photo host
const PHOTO_SIZE: &str = "676x380.webp";

/// A downloaded image ready for inline encoding
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    /// Self-contained data-URI form of the image
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Secondary fetch surface used by enrichment: binary image retrieval and
/// the album-photo listing query.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn fetch_image(&self, url: &str) -> ArchiveResult<InlineImage>;
    async fn fetch_album_photos(&self, event_id: &str, amount: u32)
        -> ArchiveResult<Vec<EventPhoto>>;
}

/// Build the fixed-size download URL for a photo descriptor
pub fn photo_download_url(base_url: &str, photo_id: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), photo_id, PHOTO_SIZE)
}

/// Inline-encode the featured photo and album photos of every record.
/// Same ids in the same order come back out; only photo fields change.
pub async fn embed_images(media: &dyn MediaSource, events: Vec<EventRecord>) -> Vec<EventRecord> {
    stream::iter(events)
        .map(|event| enrich_record(media, event))
        .buffered(ENRICH_CONCURRENCY)
        .collect()
        .await
}

async fn enrich_record(media: &dyn MediaSource, mut event: EventRecord) -> EventRecord {
    let had_featured = embed_featured_photo(media, &mut event).await;
    let wants_album = event
        .photo_album
        .as_ref()
        .map(|album| album.photo_count > 0)
        .unwrap_or(false);

    if had_featured && wants_album {
        tokio::time::sleep(PHOTO_PAUSE).await;
    }
    if wants_album {
        embed_album_photos(media, &mut event).await;
        tokio::time::sleep(PHOTO_PAUSE).await;
    }

    event
}

/// Replace the featured photo's remote URL with an inline encoding.
/// Returns whether a download was attempted.
async fn embed_featured_photo(media: &dyn MediaSource, event: &mut EventRecord) -> bool {
    let Some(photo) = event.featured_photo.as_mut() else {
        return false;
    };
    let Some(photo_id) = photo.photo_id.clone() else {
        return false;
    };
    if photo.base_url.is_empty() {
        return false;
    }

    let url = photo_download_url(&photo.base_url, &photo_id);
    match media.fetch_image(&url).await {
        Ok(image) => {
            photo.base_url = image.to_data_uri();
            // The id is only needed to build the remote URL; clear it once inlined
            photo.photo_id = None;
        }
        Err(e) => {
            warn!(event_id = %event.id, "Featured photo download failed, keeping remote URL: {}", e);
        }
    }
    true
}

/// Fetch and inline up to `MAX_ALBUM_PHOTOS` photos of the record's album.
/// The photo list is attached only when at least one photo succeeded.
async fn embed_album_photos(media: &dyn MediaSource, event: &mut EventRecord) {
    let Some(album) = event.photo_album.as_mut() else {
        return;
    };

    let listed = match media.fetch_album_photos(&event.id, album.photo_count).await {
        Ok(photos) => photos,
        Err(e) => {
            warn!(event_id = %event.id, album_id = %album.id, "Album photo query failed: {}", e);
            return;
        }
    };

    if listed.len() < album.photo_count as usize {
        debug!(
            event_id = %event.id,
            expected = album.photo_count,
            got = listed.len(),
            "Album returned fewer photos than expected"
        );
    }

    let mut inlined = Vec::new();
    for (index, photo) in listed.into_iter().take(MAX_ALBUM_PHOTOS).enumerate() {
        if index > 0 {
            tokio::time::sleep(PHOTO_PAUSE).await;
        }

        let Some(photo_id) = photo.photo_id.as_deref() else {
            continue;
        };
        let url = photo_download_url(&photo.base_url, photo_id);
        match media.fetch_image(&url).await {
            Ok(image) => inlined.push(image.to_data_uri()),
            Err(e) => {
                warn!(event_id = %event.id, "Album photo download failed, skipping: {}", e);
            }
        }
    }

    if !inlined.is_empty() {
        album.photos = Some(inlined);
    }
}
