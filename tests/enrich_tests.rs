use async_trait::async_trait;
use chrono::DateTime;
use meetup_archiver::components::archive::enrich::{
    embed_images, InlineImage, MediaSource, MAX_ALBUM_PHOTOS,
};
use meetup_archiver::components::archive::models::{
    EventPhoto, EventRecord, PhotoAlbum, RsvpSummary,
};
use meetup_archiver::error::{transport_error, ArchiveResult};
use std::sync::Mutex;

/// Media source stub with scripted failures and a request log
struct StubMediaSource {
    /// Image URLs containing this marker fail with a transport error
    fail_marker: Option<String>,
    /// Photos returned by the album listing query
    album_listing: Vec<EventPhoto>,
    album_fails: bool,
    image_requests: Mutex<Vec<String>>,
}

impl StubMediaSource {
    fn new() -> Self {
        Self {
            fail_marker: None,
            album_listing: Vec::new(),
            album_fails: false,
            image_requests: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.image_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSource for StubMediaSource {
    async fn fetch_image(&self, url: &str) -> ArchiveResult<InlineImage> {
        self.image_requests.lock().unwrap().push(url.to_string());
        if let Some(marker) = &self.fail_marker {
            if url.contains(marker.as_str()) {
                return Err(transport_error("Image download failed: timed out"));
            }
        }
        Ok(InlineImage {
            mime: "image/webp".to_string(),
            bytes: vec![1, 2, 3, 4],
        })
    }

    async fn fetch_album_photos(
        &self,
        _event_id: &str,
        _amount: u32,
    ) -> ArchiveResult<Vec<EventPhoto>> {
        if self.album_fails {
            return Err(transport_error("album query failed"));
        }
        Ok(self.album_listing.clone())
    }
}

fn make_record(id: &str) -> EventRecord {
    EventRecord {
        id: id.to_string(),
        title: format!("Event {}", id),
        description: String::new(),
        event_url: String::new(),
        status: "PAST".to_string(),
        date_time: DateTime::parse_from_rfc3339("2023-05-01T18:00:00+02:00").unwrap(),
        end_time: None,
        duration: None,
        hosts: Vec::new(),
        rsvps: RsvpSummary::default(),
        venue: None,
        featured_photo: None,
        photo_album: None,
    }
}

fn with_featured(mut record: EventRecord, photo_id: &str) -> EventRecord {
    record.featured_photo = Some(EventPhoto {
        base_url: "https://img.example.com/photos".to_string(),
        photo_id: Some(photo_id.to_string()),
    });
    record
}

fn with_album(mut record: EventRecord, photo_count: u32) -> EventRecord {
    record.photo_album = Some(PhotoAlbum {
        id: format!("album-{}", record.id),
        photo_count,
        photos: None,
    });
    record
}

fn album_listing(count: usize) -> Vec<EventPhoto> {
    (0..count)
        .map(|i| EventPhoto {
            base_url: "https://img.example.com/albums".to_string(),
            photo_id: Some(format!("p{}", i)),
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn featured_photo_is_inlined_on_success() {
    let media = StubMediaSource::new();
    let records = vec![with_featured(make_record("e1"), "42")];

    let enriched = embed_images(&media, records).await;

    let photo = enriched[0].featured_photo.as_ref().unwrap();
    assert!(photo.base_url.starts_with("data:image/webp;base64,"));
    assert!(photo.photo_id.is_none());
    assert_eq!(
        media.requested(),
        vec!["https://img.example.com/photos/42/676x380.webp".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_featured_download_leaves_descriptor_untouched() {
    let mut media = StubMediaSource::new();
    media.fail_marker = Some("42".to_string());
    let records = vec![with_featured(make_record("e1"), "42")];

    let enriched = embed_images(&media, records).await;

    assert_eq!(enriched.len(), 1);
    let photo = enriched[0].featured_photo.as_ref().unwrap();
    assert_eq!(photo.base_url, "https://img.example.com/photos");
    assert_eq!(photo.photo_id.as_deref(), Some("42"));
}

#[tokio::test(start_paused = true)]
async fn record_order_and_length_survive_mixed_failures() {
    let mut media = StubMediaSource::new();
    media.fail_marker = Some("/bad/".to_string());

    let mut failing = make_record("e2");
    failing.featured_photo = Some(EventPhoto {
        base_url: "https://img.example.com/bad".to_string(),
        photo_id: Some("x".to_string()),
    });

    let records = vec![
        with_featured(make_record("e1"), "1"),
        failing,
        with_featured(make_record("e3"), "3"),
    ];

    let enriched = embed_images(&media, records).await;

    let ids: Vec<&str> = enriched.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
}

#[tokio::test(start_paused = true)]
async fn album_downloads_are_capped() {
    let mut media = StubMediaSource::new();
    media.album_listing = album_listing(30);
    let records = vec![with_album(make_record("e1"), 30)];

    let enriched = embed_images(&media, records).await;

    let album = enriched[0].photo_album.as_ref().unwrap();
    let photos = album.photos.as_ref().unwrap();
    assert_eq!(photos.len(), MAX_ALBUM_PHOTOS);
    assert_eq!(media.requested().len(), MAX_ALBUM_PHOTOS);
}

#[tokio::test(start_paused = true)]
async fn failed_album_listing_leaves_album_without_photos() {
    let mut media = StubMediaSource::new();
    media.album_fails = true;
    let records = vec![with_album(make_record("e1"), 5)];

    let enriched = embed_images(&media, records).await;

    let album = enriched[0].photo_album.as_ref().unwrap();
    assert!(album.photos.is_none());
    assert!(media.requested().is_empty());
}

#[tokio::test(start_paused = true)]
async fn partial_album_failures_attach_only_successes() {
    let mut media = StubMediaSource::new();
    media.album_listing = album_listing(3);
    media.fail_marker = Some("p1".to_string());
    let records = vec![with_album(make_record("e1"), 3)];

    let enriched = embed_images(&media, records).await;

    let album = enriched[0].photo_album.as_ref().unwrap();
    let photos = album.photos.as_ref().unwrap();
    assert_eq!(photos.len(), 2);
    assert!(photos.iter().all(|p| p.starts_with("data:image/webp;base64,")));
}

#[tokio::test(start_paused = true)]
async fn records_without_photo_fields_pass_through() {
    let media = StubMediaSource::new();
    let records = vec![make_record("e1"), make_record("e2")];

    let enriched = embed_images(&media, records).await;

    assert_eq!(enriched.len(), 2);
    assert!(media.requested().is_empty());
}
