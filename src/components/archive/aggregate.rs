//! Merges the historical and upcoming event categories into one archive.

use super::models::{EventStatus, FetchResult, GroupArchive};
use super::paginate::fetch_all_pages;
use crate::components::api::QueryExecutor;
use crate::error::ArchiveResult;
use tracing::{info, warn};

/// Fetch both status categories for a group and merge them.
///
/// The historical category is mandatory: any failure there aborts the run.
/// The upcoming category is optional because a deployment may not expose it;
/// its failures degrade to zero additional events.
pub async fn fetch_all_group_events(
    executor: &dyn QueryExecutor,
    urlname: &str,
    page_size: usize,
    excluded_host: &str,
) -> ArchiveResult<GroupArchive> {
    let past = fetch_all_pages(executor, urlname, EventStatus::Past, page_size, excluded_host)
        .await?;

    let upcoming = match fetch_all_pages(
        executor,
        urlname,
        EventStatus::Upcoming,
        page_size,
        excluded_host,
    )
    .await
    {
        Ok(result) => result,
        Err(e) => {
            warn!("Upcoming events fetch failed, continuing without them: {}", e);
            FetchResult {
                group_id: past.group_id.clone(),
                group_name: past.group_name.clone(),
                events: Vec::new(),
            }
        }
    };

    let past_count = past.events.len();
    let upcoming_count = upcoming.events.len();

    // Past records are concatenated first, so a stable sort keeps them ahead
    // of upcoming records with equal start times
    let mut events = past.events;
    events.extend(upcoming.events);
    events.sort_by_key(|event| event.date_time);

    info!(
        past = past_count,
        upcoming = upcoming_count,
        total = events.len(),
        "Merged event categories"
    );

    Ok(GroupArchive {
        group_id: past.group_id,
        group_name: past.group_name,
        past_count,
        upcoming_count,
        events,
    })
}
