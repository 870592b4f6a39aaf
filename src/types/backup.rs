use serde::{Deserialize, Serialize};

use super::category::Category;
use super::link::Link;
use super::video::Video;

/// Format version written into every export.
pub const BACKUP_VERSION: &str = "1.0";

/// A full snapshot of the collection as written to `manager-backup-<date>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub exported_at: String,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub video_categories: Vec<Category>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub link_categories: Vec<Category>,
}

/// Per-collection counters used in an import report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCounts {
    pub videos: usize,
    pub links: usize,
    pub video_categories: usize,
    pub link_categories: usize,
}

impl ImportCounts {
    pub fn total(&self) -> usize {
        self.videos + self.links + self.video_categories + self.link_categories
    }
}

/// Outcome of importing a backup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: ImportCounts,
    pub skipped: ImportCounts,
    pub total_imported: usize,
    pub total_skipped: usize,
}

/// Number of records in each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub videos: usize,
    pub links: usize,
    pub video_categories: usize,
    pub link_categories: usize,
}
