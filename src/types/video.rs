use serde::{Deserialize, Serialize};

/// A saved video bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Payload for adding a video. A missing thumbnail is derived from the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, alias = "thumbnail")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a video. Absent fields are left untouched; for the
/// nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "thumbnail")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub channel_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub channel_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub category_id: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
