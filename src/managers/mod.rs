// ReelShelf storage managers
// Managers own the SQL for one table family each: videos, links, categories, share settings.

pub mod category_manager;
pub mod link_manager;
pub mod share_manager;
pub mod video_manager;

use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 UTC timestamp with millisecond precision.
pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Trims and lowercases tags, dropping empties and repeats while keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Tags are stored as a JSON array in a TEXT column.
pub(crate) fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn decode_tags(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}
