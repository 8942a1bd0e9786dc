//! Cursor-driven fetch loop for one status category.

use super::models::{
    EventHost, EventPhoto, EventRecord, EventStatus, FetchResult, PageInfo, PageResult,
    PhotoAlbum, RsvpSummary, Venue,
};
use crate::components::api::queries::{event_page_variables, GROUP_EVENTS_QUERY};
use crate::components::api::QueryExecutor;
use crate::error::{ArchiveResult, Error};
use chrono::DateTime;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Safety cap so a collaborator bug can never keep the loop alive forever
pub const MAX_PAGES: usize = 1000;

/// Courtesy pause between page requests
const PAGE_PAUSE: Duration = Duration::from_millis(100);

/// Fetch every page of events for one status category, applying the local
/// host filter to each page. Terminates only on the server's `hasNextPage`
/// flag going false, a `GroupNotFound`, or the safety cap.
pub async fn fetch_all_pages(
    executor: &dyn QueryExecutor,
    urlname: &str,
    status: EventStatus,
    page_size: usize,
    excluded_host: &str,
) -> ArchiveResult<FetchResult> {
    let mut cursor: Option<String> = None;
    let mut accumulated: Vec<EventRecord> = Vec::new();
    let mut group_id = String::new();
    let mut group_name = String::new();
    let mut page_index = 0usize;

    loop {
        page_index += 1;
        if page_index > MAX_PAGES {
            return Err(Error::PaginationLimitExceeded(MAX_PAGES));
        }

        let variables = event_page_variables(urlname, status, page_size, cursor.as_deref());
        let data = executor.execute(GROUP_EVENTS_QUERY, variables).await?;

        let group = match data.get("groupByUrlname") {
            Some(group) if !group.is_null() => group,
            _ => return Err(Error::GroupNotFound(urlname.to_string())),
        };

        group_id = group
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or_default()
            .to_string();
        group_name = group
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string();

        // A group may expose no event collection for a given filter;
        // that is zero events, not an error
        let connection = match group.get("events") {
            Some(connection) if !connection.is_null() => connection,
            _ => {
                debug!(urlname, status = status.as_str(), "No event collection on group");
                break;
            }
        };

        let page = parse_page(connection);
        let raw_count = page.events.len();
        let filtered = filter_excluded_host(page.events, excluded_host);
        let kept_count = filtered.len();
        accumulated.extend(filtered);

        info!(
            page = page_index,
            raw = raw_count,
            kept = kept_count,
            running_total = accumulated.len(),
            server_total = page.total_count,
            "Fetched {} events page",
            status.as_str()
        );

        // Only the server's cursor flag terminates the loop; totalCount is a
        // pre-filter figure and must not be compared against the local count
        if !page.page_info.has_next_page {
            break;
        }
        cursor = page.page_info.end_cursor;
        tokio::time::sleep(PAGE_PAUSE).await;
    }

    Ok(FetchResult {
        group_id,
        group_name,
        events: accumulated,
    })
}

/// Drop every record hosted by the sentinel identity. Order-preserving and
/// idempotent.
pub fn filter_excluded_host(events: Vec<EventRecord>, excluded_host: &str) -> Vec<EventRecord> {
    events
        .into_iter()
        .filter(|event| !event.hosts.iter().any(|host| host.name == excluded_host))
        .collect()
}

/// Parse one events connection into a page
pub fn parse_page(connection: &Value) -> PageResult {
    let total_count = connection
        .get("totalCount")
        .and_then(|c| c.as_u64())
        .unwrap_or(0) as u32;

    let page_info = PageInfo {
        end_cursor: connection
            .get("pageInfo")
            .and_then(|p| p.get("endCursor"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string()),
        has_next_page: connection
            .get("pageInfo")
            .and_then(|p| p.get("hasNextPage"))
            .and_then(|h| h.as_bool())
            .unwrap_or(false),
    };

    let events = connection
        .get("edges")
        .and_then(|e| e.as_array())
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .filter_map(parse_event_node)
                .collect()
        })
        .unwrap_or_default();

    PageResult {
        total_count,
        events,
        page_info,
    }
}

/// Convert one event node into a record. Nodes without an id or a parseable
/// start time are skipped with a warning.
fn parse_event_node(node: &Value) -> Option<EventRecord> {
    let id = node.get("id").and_then(|id| id.as_str())?.to_string();

    let date_time = match node
        .get("dateTime")
        .and_then(|d| d.as_str())
        .map(DateTime::parse_from_rfc3339)
    {
        Some(Ok(dt)) => dt,
        _ => {
            warn!(event_id = %id, "Skipping event with missing or invalid start time");
            return None;
        }
    };

    let end_time = node
        .get("endTime")
        .and_then(|d| d.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok());

    let hosts = node
        .get("hosts")
        .and_then(|h| h.as_array())
        .map(|hosts| {
            hosts
                .iter()
                .filter_map(|host| {
                    let name = host.get("name").and_then(|n| n.as_str())?;
                    Some(EventHost {
                        id: host.get("id").and_then(|i| i.as_str()).map(|s| s.to_string()),
                        name: name.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let total_count = node
        .get("going")
        .and_then(|g| g.get("totalCount"))
        .and_then(|c| c.as_u64())
        .unwrap_or(0) as u32;

    let attendees = node
        .get("rsvps")
        .and_then(|r| r.get("edges"))
        .and_then(|e| e.as_array())
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| {
                    edge.get("node")
                        .and_then(|n| n.get("user"))
                        .and_then(|u| u.get("name"))
                        .and_then(|n| n.as_str())
                        .map(|s| s.to_string())
                })
                .collect()
        })
        .unwrap_or_default();

    let venue = node.get("venue").filter(|v| !v.is_null()).map(|venue| {
        let field = |key: &str| {
            venue
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        Venue {
            name: field("name"),
            address: field("address"),
            city: field("city"),
            state: field("state"),
            country: field("country"),
        }
    });

    let featured_photo = node
        .get("featuredEventPhoto")
        .filter(|p| !p.is_null())
        .and_then(|photo| {
            let base_url = photo.get("baseUrl").and_then(|u| u.as_str())?;
            Some(EventPhoto {
                base_url: base_url.to_string(),
                photo_id: photo
                    .get("id")
                    .and_then(|i| i.as_str())
                    .map(|s| s.to_string()),
            })
        });

    let photo_album = node
        .get("photoAlbum")
        .filter(|a| !a.is_null())
        .and_then(|album| {
            let album_id = album.get("id").and_then(|i| i.as_str())?;
            Some(PhotoAlbum {
                id: album_id.to_string(),
                photo_count: album
                    .get("photoCount")
                    .and_then(|c| c.as_u64())
                    .unwrap_or(0) as u32,
                photos: None,
            })
        });

    Some(EventRecord {
        id,
        title: node
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string(),
        description: node
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or_default()
            .to_string(),
        event_url: node
            .get("eventUrl")
            .and_then(|u| u.as_str())
            .unwrap_or_default()
            .to_string(),
        status: node
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .to_string(),
        date_time,
        end_time,
        duration: node
            .get("duration")
            .and_then(|d| d.as_str())
            .map(|s| s.to_string()),
        hosts,
        rsvps: RsvpSummary {
            total_count,
            attendees,
        },
        venue,
        featured_photo,
        photo_album,
    })
}
