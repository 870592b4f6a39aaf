//! Backup Service for ReelShelf.
//!
//! Exports the whole collection as one JSON document and merges such a
//! document back in. Import is additive: records whose URL (items) or
//! case-insensitive name (categories) already exist are skipped, and each
//! accepted record is written on its own, so a failure part-way leaves the
//! records before it in place.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::managers::category_manager::{CategoryManager, CategoryManagerTrait};
use crate::managers::link_manager::{LinkManager, LinkManagerTrait};
use crate::managers::now;
use crate::managers::video_manager::{VideoManager, VideoManagerTrait};
use crate::types::backup::{CollectionStats, ExportData, ImportCounts, ImportReport, BACKUP_VERSION};
use crate::types::category::{Category, NewCategory};
use crate::types::errors::BackupError;
use crate::types::link::NewLink;
use crate::types::video::NewVideo;

/// File name offered for an export taken on `date`.
pub fn backup_filename(date: NaiveDate) -> String {
    format!("manager-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Trait defining backup operations.
pub trait BackupServiceTrait {
    fn export(&self) -> Result<ExportData, BackupError>;
    fn import(&mut self, data: ExportData) -> Result<ImportReport, BackupError>;
    fn stats(&self) -> Result<CollectionStats, BackupError>;
}

pub struct BackupService<'a> {
    conn: &'a Connection,
}

impl<'a> BackupService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Imports categories for one table, top-level ones first. A child keeps
    /// its parent only when that parent was created by this same import.
    /// Returns `(imported, skipped)`.
    fn import_categories(
        &self,
        mut manager: CategoryManager<'a>,
        incoming: Vec<Category>,
    ) -> Result<(usize, usize), BackupError> {
        let mut names: HashSet<String> = manager
            .list_categories()?
            .into_iter()
            .map(|c| c.name.to_lowercase())
            .collect();
        let mut new_ids: HashMap<String, String> = HashMap::new();
        let (mut imported, mut skipped) = (0, 0);

        let (top, children): (Vec<Category>, Vec<Category>) =
            incoming.into_iter().partition(|c| c.parent_id.is_none());

        for category in top {
            if !names.insert(category.name.to_lowercase()) {
                skipped += 1;
                continue;
            }
            let created = manager.add_category(NewCategory {
                name: category.name,
                color: category.color,
                parent_id: None,
            })?;
            if !category.id.is_empty() {
                new_ids.insert(category.id, created.id);
            }
            imported += 1;
        }

        for category in children {
            if !names.insert(category.name.to_lowercase()) {
                skipped += 1;
                continue;
            }
            let parent_id = category
                .parent_id
                .as_ref()
                .and_then(|old| new_ids.get(old))
                .cloned();
            manager.add_category(NewCategory {
                name: category.name,
                color: category.color,
                parent_id,
            })?;
            imported += 1;
        }

        Ok((imported, skipped))
    }
}

impl<'a> BackupServiceTrait for BackupService<'a> {
    fn export(&self) -> Result<ExportData, BackupError> {
        Ok(ExportData {
            version: BACKUP_VERSION.to_string(),
            exported_at: now(),
            videos: VideoManager::new(self.conn).list_videos()?,
            video_categories: CategoryManager::videos(self.conn).list_categories()?,
            links: LinkManager::new(self.conn).list_links()?,
            link_categories: CategoryManager::links(self.conn).list_categories()?,
        })
    }

    fn import(&mut self, data: ExportData) -> Result<ImportReport, BackupError> {
        if data.version.trim().is_empty() {
            return Err(BackupError::InvalidFormat("missing version".to_string()));
        }

        let mut imported = ImportCounts::default();
        let mut skipped = ImportCounts::default();

        (imported.video_categories, skipped.video_categories) =
            self.import_categories(CategoryManager::videos(self.conn), data.video_categories)?;
        (imported.link_categories, skipped.link_categories) =
            self.import_categories(CategoryManager::links(self.conn), data.link_categories)?;

        // Category ids in a backup belong to another database; items come in uncategorized.
        let mut videos = VideoManager::new(self.conn);
        let mut video_urls: HashSet<String> =
            videos.list_videos()?.into_iter().map(|v| v.url).collect();
        for video in data.videos {
            if !video_urls.insert(video.url.clone()) {
                skipped.videos += 1;
                continue;
            }
            videos.add_video(NewVideo {
                title: video.title,
                url: video.url,
                thumbnail_url: Some(video.thumbnail_url),
                description: video.description,
                channel_name: video.channel_name,
                channel_url: video.channel_url,
                category_id: None,
                tags: video.tags,
            })?;
            imported.videos += 1;
        }

        let mut links = LinkManager::new(self.conn);
        let mut link_urls: HashSet<String> =
            links.list_links()?.into_iter().map(|l| l.url).collect();
        for link in data.links {
            if !link_urls.insert(link.url.clone()) {
                skipped.links += 1;
                continue;
            }
            links.add_link(NewLink {
                title: link.title,
                url: link.url,
                favicon: link.favicon,
                description: link.description,
                category_id: None,
                tags: link.tags,
            })?;
            imported.links += 1;
        }

        let report = ImportReport {
            total_imported: imported.total(),
            total_skipped: skipped.total(),
            imported,
            skipped,
        };
        tracing::info!(
            imported = report.total_imported,
            skipped = report.total_skipped,
            "backup imported"
        );
        Ok(report)
    }

    fn stats(&self) -> Result<CollectionStats, BackupError> {
        Ok(CollectionStats {
            videos: VideoManager::new(self.conn).count_videos()?,
            links: LinkManager::new(self.conn).count_links()?,
            video_categories: CategoryManager::videos(self.conn).count_categories()?,
            link_categories: CategoryManager::links(self.conn).count_categories()?,
        })
    }
}
