use crate::components::archive::models::EventStatus;
use serde_json::{json, Value};

/// Main paginated events query. One page of events for a group, selected by
/// status, with the cursor state needed to request the next page.
pub const GROUP_EVENTS_QUERY: &str = r#"
query GroupEvents($urlname: String!, $status: EventStatus!, $itemsNum: Int!, $cursor: String) {
  groupByUrlname(urlname: $urlname) {
    id
    name
    events(status: $status, first: $itemsNum, after: $cursor) {
      totalCount
      pageInfo {
        endCursor
        hasNextPage
      }
      edges {
        node {
          id
          title
          description
          eventUrl
          status
          dateTime
          endTime
          duration
          hosts {
            id
            name
          }
          going {
            totalCount
          }
          rsvps(input: { first: 10 }) {
            edges {
              node {
                user {
                  name
                }
              }
            }
          }
          venue {
            name
            address
            city
            state
            country
          }
          featuredEventPhoto {
            id
            baseUrl
          }
          photoAlbum {
            id
            photoCount
          }
        }
      }
    }
  }
}
"#;

/// Secondary query used by enrichment to list an event's album photos
pub const ALBUM_PHOTOS_QUERY: &str = r#"
query EventAlbumPhotos($eventId: ID!, $amount: Int!) {
  event(id: $eventId) {
    photoAlbum {
      photoSample(amount: $amount) {
        id
        baseUrl
      }
    }
  }
}
"#;

/// Trivial self-identity query used only to probe that the token is valid
pub const SELF_QUERY: &str = r#"
query { self { id name } }
"#;

/// Build the variable map for one page of the main events query
pub fn event_page_variables(
    urlname: &str,
    status: EventStatus,
    page_size: usize,
    cursor: Option<&str>,
) -> Value {
    json!({
        "urlname": urlname,
        "status": status.as_str(),
        "itemsNum": page_size,
        "cursor": cursor,
    })
}

/// Build the variable map for the album photos query
pub fn album_photo_variables(event_id: &str, amount: u32) -> Value {
    json!({
        "eventId": event_id,
        "amount": amount,
    })
}
