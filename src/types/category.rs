use serde::{Deserialize, Serialize};

/// A user-defined grouping label, optionally nested one level under a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Selects the table pair a category operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Video,
    Link,
}

impl CategoryKind {
    /// Table holding the categories themselves.
    pub fn category_table(self) -> &'static str {
        match self {
            CategoryKind::Video => "categories",
            CategoryKind::Link => "link_categories",
        }
    }

    /// Table holding the bookmarks that reference these categories.
    pub fn item_table(self) -> &'static str {
        match self {
            CategoryKind::Video => "videos",
            CategoryKind::Link => "links",
        }
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Partial update for a category. `parent_id: Some(None)` moves it to the top level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub parent_id: Option<Option<String>>,
}
