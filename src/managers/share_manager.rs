//! Share Manager for ReelShelf.
//!
//! Stores the public sharing preferences and assembles the read-only view of
//! the collection that visitors of a public slug see.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};

use super::category_manager::{CategoryManager, CategoryManagerTrait};
use super::link_manager::{LinkManager, LinkManagerTrait};
use super::video_manager::{VideoManager, VideoManagerTrait};
use crate::services::platform_detector::detect_platform;
use crate::types::category::Category;
use crate::types::errors::ShareError;
use crate::types::share::{
    PublicCollection, PublicLink, PublicProfile, PublicVideo, ShareSettings, ShareSettingsPatch,
};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]{3,50}$").expect("slug pattern must compile"));

/// Validates a public slug: 3–50 characters of lowercase letters, digits and hyphens.
pub fn validate_slug(slug: &str) -> Result<(), ShareError> {
    if SLUG_PATTERN.is_match(slug) {
        Ok(())
    } else {
        Err(ShareError::InvalidSlug(format!(
            "'{}' must be 3-50 characters of lowercase letters, numbers, and hyphens",
            slug
        )))
    }
}

/// Trait defining public sharing operations.
pub trait ShareManagerTrait {
    fn get_settings(&self) -> Result<ShareSettings, ShareError>;
    fn update_settings(&mut self, patch: ShareSettingsPatch) -> Result<ShareSettings, ShareError>;
    fn public_collection(&self, slug: &str) -> Result<PublicCollection, ShareError>;
}

pub struct ShareManager<'a> {
    conn: &'a Connection,
}

impl<'a> ShareManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_settings(row: &rusqlite::Row) -> rusqlite::Result<ShareSettings> {
        Ok(ShareSettings {
            display_name: row.get(0)?,
            is_public: row.get(1)?,
            share_videos: row.get(2)?,
            share_links: row.get(3)?,
            public_slug: row.get(4)?,
        })
    }
}

fn category_label(categories: &[Category], id: Option<&str>) -> (Option<String>, Option<String>) {
    match id.and_then(|id| categories.iter().find(|c| c.id == id)) {
        Some(c) => (Some(c.name.clone()), Some(c.color.clone())),
        None => (None, None),
    }
}

impl<'a> ShareManagerTrait for ShareManager<'a> {
    fn get_settings(&self) -> Result<ShareSettings, ShareError> {
        let stored = self
            .conn
            .query_row(
                "SELECT display_name, is_public, share_videos, share_links, public_slug \
                 FROM share_settings WHERE id = 'default'",
                [],
                Self::row_to_settings,
            )
            .optional()
            .map_err(|e| ShareError::DatabaseError(e.to_string()))?;
        Ok(stored.unwrap_or_default())
    }

    fn update_settings(&mut self, patch: ShareSettingsPatch) -> Result<ShareSettings, ShareError> {
        let mut settings = self.get_settings()?;

        if let Some(display_name) = patch.display_name {
            settings.display_name = display_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());
        }
        if let Some(is_public) = patch.is_public {
            settings.is_public = is_public;
        }
        if let Some(share_videos) = patch.share_videos {
            settings.share_videos = share_videos;
        }
        if let Some(share_links) = patch.share_links {
            settings.share_links = share_links;
        }
        if let Some(slug) = patch.public_slug {
            let slug = slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
            if let Some(s) = slug.as_deref() {
                validate_slug(s)?;
            }
            settings.public_slug = slug;
        }

        self.conn
            .execute(
                "INSERT INTO share_settings (id, display_name, is_public, share_videos, share_links, public_slug) \
                 VALUES ('default', ?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name, \
                 is_public = excluded.is_public, share_videos = excluded.share_videos, \
                 share_links = excluded.share_links, public_slug = excluded.public_slug",
                params![
                    settings.display_name,
                    settings.is_public,
                    settings.share_videos,
                    settings.share_links,
                    settings.public_slug
                ],
            )
            .map_err(|e| ShareError::DatabaseError(e.to_string()))?;

        tracing::info!(is_public = settings.is_public, "share settings updated");
        Ok(settings)
    }

    /// Returns the shared sections of the collection for a public slug.
    fn public_collection(&self, slug: &str) -> Result<PublicCollection, ShareError> {
        let settings = self.get_settings()?;
        if !settings.is_public || settings.public_slug.as_deref() != Some(slug) {
            return Err(ShareError::NotFound);
        }

        let mut videos = Vec::new();
        if settings.share_videos {
            let categories = CategoryManager::videos(self.conn)
                .list_categories()
                .map_err(|e| ShareError::DatabaseError(e.to_string()))?;
            let stored = VideoManager::new(self.conn)
                .list_videos()
                .map_err(|e| ShareError::DatabaseError(e.to_string()))?;
            videos = stored
                .into_iter()
                .map(|v| {
                    let (category_name, category_color) =
                        category_label(&categories, v.category_id.as_deref());
                    PublicVideo {
                        platform: detect_platform(&v.url),
                        id: v.id,
                        title: v.title,
                        url: v.url,
                        thumbnail_url: v.thumbnail_url,
                        tags: v.tags,
                        created_at: v.created_at,
                        category_name,
                        category_color,
                    }
                })
                .collect();
        }

        let mut links = Vec::new();
        if settings.share_links {
            let categories = CategoryManager::links(self.conn)
                .list_categories()
                .map_err(|e| ShareError::DatabaseError(e.to_string()))?;
            let stored = LinkManager::new(self.conn)
                .list_links()
                .map_err(|e| ShareError::DatabaseError(e.to_string()))?;
            links = stored
                .into_iter()
                .map(|l| {
                    let (category_name, category_color) =
                        category_label(&categories, l.category_id.as_deref());
                    PublicLink {
                        id: l.id,
                        title: l.title,
                        url: l.url,
                        favicon: l.favicon,
                        tags: l.tags,
                        created_at: l.created_at,
                        category_name,
                        category_color,
                    }
                })
                .collect();
        }

        Ok(PublicCollection {
            profile: PublicProfile {
                display_name: settings.display_name,
                share_videos: settings.share_videos,
                share_links: settings.share_links,
            },
            videos,
            links,
        })
    }
}
