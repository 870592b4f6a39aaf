//! Video Manager for ReelShelf.
//!
//! Implements `VideoManagerTrait`: CRUD operations for video bookmarks,
//! backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{decode_tags, encode_tags, normalize_tags, now};
use crate::services::platform_detector;
use crate::types::errors::VideoError;
use crate::types::video::{NewVideo, Video, VideoPatch};

const VIDEO_COLUMNS: &str = "id, title, url, thumbnail_url, description, channel_name, \
                             channel_url, category_id, tags, created_at";

/// Trait defining video bookmark operations.
pub trait VideoManagerTrait {
    fn list_videos(&self) -> Result<Vec<Video>, VideoError>;
    fn get_video(&self, id: &str) -> Result<Video, VideoError>;
    fn add_video(&mut self, video: NewVideo) -> Result<Video, VideoError>;
    fn update_video(&mut self, id: &str, patch: VideoPatch) -> Result<Video, VideoError>;
    fn delete_video(&mut self, id: &str) -> Result<(), VideoError>;
    fn count_videos(&self) -> Result<usize, VideoError>;
}

/// Video manager backed by a SQLite connection.
pub struct VideoManager<'a> {
    conn: &'a Connection,
}

impl<'a> VideoManager<'a> {
    /// Creates a new `VideoManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_video(row: &rusqlite::Row) -> rusqlite::Result<Video> {
        Ok(Video {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            thumbnail_url: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            description: row.get(4)?,
            channel_name: row.get(5)?,
            channel_url: row.get(6)?,
            category_id: row.get(7)?,
            tags: decode_tags(row.get(8)?),
            created_at: row.get(9)?,
        })
    }

    fn find(&self, id: &str) -> Result<Option<Video>, VideoError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM videos WHERE id = ?1", VIDEO_COLUMNS),
                params![id],
                Self::row_to_video,
            )
            .optional()
            .map_err(|e| VideoError::DatabaseError(e.to_string()))
    }
}

impl<'a> VideoManagerTrait for VideoManager<'a> {
    /// Lists all videos, newest first.
    fn list_videos(&self) -> Result<Vec<Video>, VideoError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM videos ORDER BY created_at DESC, rowid DESC",
                VIDEO_COLUMNS
            ))
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_video)
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| VideoError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    fn get_video(&self, id: &str) -> Result<Video, VideoError> {
        self.find(id)?
            .ok_or_else(|| VideoError::NotFound(id.to_string()))
    }

    /// Adds a video and returns the stored record.
    ///
    /// When no thumbnail is supplied one is derived from the URL's platform.
    fn add_video(&mut self, video: NewVideo) -> Result<Video, VideoError> {
        let thumbnail = match video.thumbnail_url {
            Some(t) if !t.is_empty() => t,
            _ => platform_detector::thumbnail_for(&video.url),
        };
        let stored = Video {
            id: Uuid::new_v4().to_string(),
            title: video.title,
            url: video.url,
            thumbnail_url: thumbnail,
            description: video.description,
            channel_name: video.channel_name,
            channel_url: video.channel_url,
            category_id: video.category_id,
            tags: normalize_tags(&video.tags),
            created_at: now(),
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO videos ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    VIDEO_COLUMNS
                ),
                params![
                    stored.id,
                    stored.title,
                    stored.url,
                    stored.thumbnail_url,
                    stored.description,
                    stored.channel_name,
                    stored.channel_url,
                    stored.category_id,
                    encode_tags(&stored.tags),
                    stored.created_at
                ],
            )
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        tracing::info!(id = %stored.id, url = %stored.url, "video added");
        Ok(stored)
    }

    /// Applies a partial update and returns the stored record.
    fn update_video(&mut self, id: &str, patch: VideoPatch) -> Result<Video, VideoError> {
        let mut video = self.get_video(id)?;

        if let Some(title) = patch.title {
            video.title = title;
        }
        if let Some(url) = patch.url {
            video.url = url;
        }
        if let Some(thumbnail) = patch.thumbnail_url {
            video.thumbnail_url = thumbnail;
        }
        if let Some(description) = patch.description {
            video.description = description;
        }
        if let Some(channel_name) = patch.channel_name {
            video.channel_name = channel_name;
        }
        if let Some(channel_url) = patch.channel_url {
            video.channel_url = channel_url;
        }
        if let Some(category_id) = patch.category_id {
            video.category_id = category_id;
        }
        if let Some(tags) = patch.tags {
            video.tags = normalize_tags(&tags);
        }

        self.conn
            .execute(
                "UPDATE videos SET title = ?1, url = ?2, thumbnail_url = ?3, description = ?4, \
                 channel_name = ?5, channel_url = ?6, category_id = ?7, tags = ?8 WHERE id = ?9",
                params![
                    video.title,
                    video.url,
                    video.thumbnail_url,
                    video.description,
                    video.channel_name,
                    video.channel_url,
                    video.category_id,
                    encode_tags(&video.tags),
                    id
                ],
            )
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        tracing::info!(id, "video updated");
        Ok(video)
    }

    /// Deletes a video. Deleting an unknown id is a no-op.
    fn delete_video(&mut self, id: &str) -> Result<(), VideoError> {
        self.conn
            .execute("DELETE FROM videos WHERE id = ?1", params![id])
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;
        tracing::info!(id, "video deleted");
        Ok(())
    }

    fn count_videos(&self) -> Result<usize, VideoError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| VideoError::DatabaseError(e.to_string()))
    }
}
