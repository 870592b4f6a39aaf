//! Link Manager for ReelShelf.
//!
//! Implements `LinkManagerTrait`: CRUD operations for web link bookmarks.

use rusqlite::{params, Connection, OptionalExtension};
use url::Url;
use uuid::Uuid;

use super::{decode_tags, encode_tags, normalize_tags, now};
use crate::types::errors::LinkError;
use crate::types::link::{Link, LinkPatch, NewLink};

const LINK_COLUMNS: &str = "id, title, url, favicon, description, category_id, tags, created_at";

/// Favicon service URL for the host of `url`, or `None` if the URL has no host.
pub fn favicon_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?domain={}&sz=64",
        host
    ))
}

/// Trait defining link bookmark operations.
pub trait LinkManagerTrait {
    fn list_links(&self) -> Result<Vec<Link>, LinkError>;
    fn get_link(&self, id: &str) -> Result<Link, LinkError>;
    fn add_link(&mut self, link: NewLink) -> Result<Link, LinkError>;
    fn update_link(&mut self, id: &str, patch: LinkPatch) -> Result<Link, LinkError>;
    fn delete_link(&mut self, id: &str) -> Result<(), LinkError>;
    fn count_links(&self) -> Result<usize, LinkError>;
}

/// Link manager backed by a SQLite connection.
pub struct LinkManager<'a> {
    conn: &'a Connection,
}

impl<'a> LinkManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_link(row: &rusqlite::Row) -> rusqlite::Result<Link> {
        Ok(Link {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            favicon: row.get(3)?,
            description: row.get(4)?,
            category_id: row.get(5)?,
            tags: decode_tags(row.get(6)?),
            created_at: row.get(7)?,
        })
    }
}

impl<'a> LinkManagerTrait for LinkManager<'a> {
    /// Lists all links, newest first.
    fn list_links(&self) -> Result<Vec<Link>, LinkError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM links ORDER BY created_at DESC, rowid DESC",
                LINK_COLUMNS
            ))
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_link)
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| LinkError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    fn get_link(&self, id: &str) -> Result<Link, LinkError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM links WHERE id = ?1", LINK_COLUMNS),
                params![id],
                Self::row_to_link,
            )
            .optional()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?
            .ok_or_else(|| LinkError::NotFound(id.to_string()))
    }

    fn add_link(&mut self, link: NewLink) -> Result<Link, LinkError> {
        let favicon = match link.favicon {
            Some(f) if !f.is_empty() => Some(f),
            _ => favicon_for(&link.url),
        };
        let stored = Link {
            id: Uuid::new_v4().to_string(),
            title: link.title,
            url: link.url,
            favicon,
            description: link.description,
            category_id: link.category_id,
            tags: normalize_tags(&link.tags),
            created_at: now(),
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO links ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    LINK_COLUMNS
                ),
                params![
                    stored.id,
                    stored.title,
                    stored.url,
                    stored.favicon,
                    stored.description,
                    stored.category_id,
                    encode_tags(&stored.tags),
                    stored.created_at
                ],
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        tracing::info!(id = %stored.id, url = %stored.url, "link added");
        Ok(stored)
    }

    fn update_link(&mut self, id: &str, patch: LinkPatch) -> Result<Link, LinkError> {
        let mut link = self.get_link(id)?;

        if let Some(title) = patch.title {
            link.title = title;
        }
        if let Some(url) = patch.url {
            link.url = url;
        }
        if let Some(favicon) = patch.favicon {
            link.favicon = favicon;
        }
        if let Some(description) = patch.description {
            link.description = description;
        }
        if let Some(category_id) = patch.category_id {
            link.category_id = category_id;
        }
        if let Some(tags) = patch.tags {
            link.tags = normalize_tags(&tags);
        }

        self.conn
            .execute(
                "UPDATE links SET title = ?1, url = ?2, favicon = ?3, description = ?4, \
                 category_id = ?5, tags = ?6 WHERE id = ?7",
                params![
                    link.title,
                    link.url,
                    link.favicon,
                    link.description,
                    link.category_id,
                    encode_tags(&link.tags),
                    id
                ],
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        tracing::info!(id, "link updated");
        Ok(link)
    }

    /// Deletes a link. Deleting an unknown id is a no-op.
    fn delete_link(&mut self, id: &str) -> Result<(), LinkError> {
        self.conn
            .execute("DELETE FROM links WHERE id = ?1", params![id])
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        tracing::info!(id, "link deleted");
        Ok(())
    }

    fn count_links(&self) -> Result<usize, LinkError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| LinkError::DatabaseError(e.to_string()))
    }
}
