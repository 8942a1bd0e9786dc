use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// The two event partitions exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Past,
    Upcoming,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Past => "PAST",
            EventStatus::Upcoming => "UPCOMING",
        }
    }
}

/// One host identity attached to an event
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventHost {
    pub id: Option<String>,
    pub name: String,
}

/// RSVP count plus a partial sample of attendee names
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RsvpSummary {
    pub total_count: u32,
    pub attendees: Vec<String>,
}

/// Venue descriptor, all fields optional since online events carry none of them
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Venue {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Featured event photo. After enrichment `base_url` holds a self-contained
/// data URI and `photo_id` is cleared; until then it is the remote URL template.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventPhoto {
    pub base_url: String,
    pub photo_id: Option<String>,
}

/// Photo album descriptor. `photos` is attached by enrichment and holds
/// data URIs for each photo that downloaded successfully.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PhotoAlbum {
    pub id: String,
    pub photo_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

/// One archived event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_url: String,
    pub status: String,
    pub date_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub duration: Option<String>,
    pub hosts: Vec<EventHost>,
    pub rsvps: RsvpSummary,
    pub venue: Option<Venue>,
    pub featured_photo: Option<EventPhoto>,
    pub photo_album: Option<PhotoAlbum>,
}

/// Cursor state returned with each page
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One page of events as parsed from a response
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub total_count: u32,
    pub events: Vec<EventRecord>,
    pub page_info: PageInfo,
}

/// All events accumulated for one status category
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub group_id: String,
    pub group_name: String,
    pub events: Vec<EventRecord>,
}

/// Merged result of both status categories, sorted ascending by start time
#[derive(Debug, Clone)]
pub struct GroupArchive {
    pub group_id: String,
    pub group_name: String,
    pub past_count: usize,
    pub upcoming_count: usize,
    pub events: Vec<EventRecord>,
}

/// On-disk shape of the archive JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub archived_at: DateTime<Utc>,
    pub group_urlname: String,
    pub group_id: String,
    pub group_name: String,
    pub total_count: usize,
    pub past_count: usize,
    pub upcoming_count: usize,
    pub events: Vec<EventRecord>,
}

impl ArchiveDocument {
    /// Build the writable document from an archive plus run metadata
    pub fn new(group_urlname: &str, archive: GroupArchive) -> Self {
        ArchiveDocument {
            archived_at: Utc::now(),
            group_urlname: group_urlname.to_string(),
            group_id: archive.group_id,
            group_name: archive.group_name,
            total_count: archive.events.len(),
            past_count: archive.past_count,
            upcoming_count: archive.upcoming_count,
            events: archive.events,
        }
    }
}
