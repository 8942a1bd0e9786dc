//! Static HTML report generation from an archive document.
//!
//! Everything textual is escaped before any markup is produced, descriptions
//! go through a small line-oriented Markdown converter, and images are only
//! ever emitted for inline-encoded `data:` URLs so the report stays fully
//! self-contained.

use crate::components::archive::models::{ArchiveDocument, EventRecord};

/// Render the whole archive as one self-contained HTML document
pub fn render_html(document: &ArchiveDocument) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{} - Event Archive</title>\n",
        escape_html(&document.group_name)
    ));
    html.push_str("<style>\n");
    html.push_str(
        "body { font-family: sans-serif; max-width: 56rem; margin: 0 auto; padding: 1rem; }\n\
         article { border-bottom: 1px solid #ddd; padding: 1rem 0; }\n\
         .meta { color: #555; font-size: 0.9rem; }\n\
         img { max-width: 100%; height: auto; margin: 0.25rem 0; }\n\
         .album img { max-width: 12rem; }\n",
    );
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&document.group_name)));
    html.push_str(&format!(
        "<p class=\"meta\">{} events archived ({} past, {} upcoming) on {}</p>\n",
        document.total_count,
        document.past_count,
        document.upcoming_count,
        document.archived_at.format("%Y-%m-%d %H:%M UTC")
    ));

    for event in &document.events {
        html.push_str(&render_event(event));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_event(event: &EventRecord) -> String {
    let mut html = String::from("<article>\n");

    let title = escape_html(&event.title);
    if is_http_url(&event.event_url) {
        html.push_str(&format!(
            "<h2><a href=\"{}\">{}</a></h2>\n",
            escape_html(&event.event_url),
            title
        ));
    } else {
        html.push_str(&format!("<h2>{}</h2>\n", title));
    }

    html.push_str(&format!(
        "<p class=\"meta\">{}",
        event.date_time.format("%A, %B %-d %Y at %H:%M")
    ));
    if let Some(end) = &event.end_time {
        html.push_str(&format!(" &ndash; {}", end.format("%H:%M")));
    }
    html.push_str("</p>\n");

    if let Some(venue) = &event.venue {
        let parts: Vec<&str> = [&venue.name, &venue.address, &venue.city, &venue.country]
            .iter()
            .filter_map(|field| field.as_deref())
            .filter(|s| !s.is_empty())
            .collect();
        if !parts.is_empty() {
            html.push_str(&format!(
                "<p class=\"meta\">{}</p>\n",
                escape_html(&parts.join(", "))
            ));
        }
    }

    if !event.hosts.is_empty() {
        let names: Vec<String> = event
            .hosts
            .iter()
            .map(|host| escape_html(&host.name))
            .collect();
        html.push_str(&format!(
            "<p class=\"meta\">Hosted by {}</p>\n",
            names.join(", ")
        ));
    }

    html.push_str(&format!(
        "<p class=\"meta\">{} attendees",
        event.rsvps.total_count
    ));
    if !event.rsvps.attendees.is_empty() {
        let sample: Vec<String> = event
            .rsvps
            .attendees
            .iter()
            .map(|name| escape_html(name))
            .collect();
        html.push_str(&format!(" (including {})", sample.join(", ")));
    }
    html.push_str("</p>\n");

    if let Some(photo) = &event.featured_photo {
        if photo.base_url.starts_with("data:") {
            html.push_str(&format!("<img src=\"{}\" alt=\"\">\n", photo.base_url));
        }
    }

    if !event.description.is_empty() {
        html.push_str(&markdown_to_html(&event.description));
    }

    if let Some(album) = &event.photo_album {
        if let Some(photos) = &album.photos {
            html.push_str("<div class=\"album\">\n");
            for photo in photos {
                if photo.starts_with("data:") {
                    html.push_str(&format!("<img src=\"{}\" alt=\"\">\n", photo));
                }
            }
            html.push_str("</div>\n");
        }
    }

    html.push_str("</article>\n");
    html
}

/// Escape text for safe inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Convert Markdown-formatted text to sanitized HTML.
///
/// Line-oriented: headings, list items and paragraphs, with bold, italic and
/// http(s) links inline. Input is escaped before any markup is produced.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut in_list = false;

    let flush_paragraph = |html: &mut String, paragraph: &mut Vec<String>| {
        if !paragraph.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", paragraph.join("<br>\n")));
            paragraph.clear();
        }
    };
    let close_list = |html: &mut String, in_list: &mut bool| {
        if *in_list {
            html.push_str("</ul>\n");
            *in_list = false;
        }
    };

    for line in markdown.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut in_list);
            continue;
        }

        // Headings
        if let Some(rest) = trimmed.strip_prefix('#') {
            let level = 1 + rest.chars().take_while(|c| *c == '#').count();
            let text = rest.trim_start_matches('#').trim();
            if level <= 6 && !text.is_empty() {
                flush_paragraph(&mut html, &mut paragraph);
                close_list(&mut html, &mut in_list);
                // Description headings start below the event title
                let level = (level + 2).min(6);
                html.push_str(&format!(
                    "<h{}>{}</h{}>\n",
                    level,
                    convert_inline(text),
                    level
                ));
                continue;
            }
        }

        // List items
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush_paragraph(&mut html, &mut paragraph);
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{}</li>\n", convert_inline(item)));
            continue;
        }

        close_list(&mut html, &mut in_list);
        paragraph.push(convert_inline(trimmed));
    }

    flush_paragraph(&mut html, &mut paragraph);
    close_list(&mut html, &mut in_list);
    html
}

/// Apply inline Markdown (links, bold, italic) to one escaped line
fn convert_inline(text: &str) -> String {
    let linked = convert_links(&escape_html(text));
    let bold = convert_pairs(&linked, "**", "<strong>", "</strong>");
    convert_pairs(&bold, "*", "<em>", "</em>")
}

/// Convert `[text](url)` spans. Only http(s) targets become links; anything
/// else is rendered as its bare text.
fn convert_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        let Some(mid_rel) = rest[open..].find("](") else {
            break;
        };
        let mid = open + mid_rel;
        let Some(close_rel) = rest[mid + 2..].find(')') else {
            break;
        };
        let close = mid + 2 + close_rel;

        let label = &rest[open + 1..mid];
        let href = &rest[mid + 2..close];

        out.push_str(&rest[..open]);
        if is_http_url(href) {
            out.push_str(&format!("<a href=\"{}\">{}</a>", href, label));
        } else {
            out.push_str(label);
        }
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Wrap text between balanced delimiter pairs in open/close tags
fn convert_pairs(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(delim) {
        let after = start + delim.len();
        let Some(end_rel) = rest[after..].find(delim) else {
            break;
        };
        let inner = &rest[after..after + end_rel];
        if inner.is_empty() {
            // Adjacent delimiters carry no content, emit them verbatim
            out.push_str(&rest[..after + end_rel + delim.len()]);
            rest = &rest[after + end_rel + delim.len()..];
            continue;
        }

        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(inner);
        out.push_str(close);
        rest = &rest[after + end_rel + delim.len()..];
    }

    out.push_str(rest);
    out
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
