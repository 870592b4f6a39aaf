use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// Public sharing preferences for the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSettings {
    pub display_name: Option<String>,
    pub is_public: bool,
    pub share_videos: bool,
    pub share_links: bool,
    pub public_slug: Option<String>,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            display_name: None,
            is_public: false,
            share_videos: true,
            share_links: true,
            public_slug: None,
        }
    }
}

/// Partial update of the sharing preferences. An empty `publicSlug` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSettingsPatch {
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub display_name: Option<Option<String>>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub share_videos: Option<bool>,
    #[serde(default)]
    pub share_links: Option<bool>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub public_slug: Option<Option<String>>,
}

/// Profile header shown on a public collection page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub display_name: Option<String>,
    pub share_videos: bool,
    pub share_links: bool,
}

/// A video as exposed on a public page, joined with its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVideo {
    pub id: String,
    pub title: String,
    pub url: String,
    pub platform: Platform,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

/// A link as exposed on a public page, joined with its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLink {
    pub id: String,
    pub title: String,
    pub url: String,
    pub favicon: Option<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

/// Everything a visitor of a public slug may see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCollection {
    pub profile: PublicProfile,
    pub videos: Vec<PublicVideo>,
    pub links: Vec<PublicLink>,
}
