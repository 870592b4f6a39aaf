//! Category Manager for ReelShelf.
//!
//! Implements `CategoryManagerTrait` for both category tables. A
//! [`CategoryKind`] picks the table pair; the SQL is otherwise shared.
//!
//! The hierarchy is one level deep and enforced on write: a parent must exist
//! and be top-level, and a category that has children cannot become a child.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::types::category::{Category, CategoryKind, CategoryPatch, NewCategory};
use crate::types::errors::CategoryError;

/// Trait defining category management operations.
pub trait CategoryManagerTrait {
    fn list_categories(&self) -> Result<Vec<Category>, CategoryError>;
    fn get_category(&self, id: &str) -> Result<Category, CategoryError>;
    fn add_category(&mut self, category: NewCategory) -> Result<Category, CategoryError>;
    fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Result<Category, CategoryError>;
    fn delete_category(&mut self, id: &str) -> Result<(), CategoryError>;
    fn count_categories(&self) -> Result<usize, CategoryError>;
}

/// Category manager for one category table, backed by a SQLite connection.
pub struct CategoryManager<'a> {
    conn: &'a Connection,
    kind: CategoryKind,
}

impl<'a> CategoryManager<'a> {
    pub fn new(conn: &'a Connection, kind: CategoryKind) -> Self {
        Self { conn, kind }
    }

    /// Manager for the video categories table.
    pub fn videos(conn: &'a Connection) -> Self {
        Self::new(conn, CategoryKind::Video)
    }

    /// Manager for the link categories table.
    pub fn links(conn: &'a Connection) -> Self {
        Self::new(conn, CategoryKind::Link)
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    fn table(&self) -> &'static str {
        self.kind.category_table()
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            parent_id: row.get(3)?,
        })
    }

    fn find(&self, id: &str) -> Result<Option<Category>, CategoryError> {
        self.conn
            .query_row(
                &format!(
                    "SELECT id, name, color, parent_id FROM {} WHERE id = ?1",
                    self.table()
                ),
                params![id],
                Self::row_to_category,
            )
            .optional()
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))
    }

    fn has_children(&self, id: &str) -> Result<bool, CategoryError> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE parent_id = ?1", self.table()),
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Checks that `parent_id` names an existing top-level category.
    fn validate_parent(&self, parent_id: &str) -> Result<(), CategoryError> {
        match self.find(parent_id)? {
            None => Err(CategoryError::InvalidParent(format!(
                "parent category {} does not exist",
                parent_id
            ))),
            Some(parent) if parent.parent_id.is_some() => Err(CategoryError::InvalidParent(
                format!("{} is itself a subcategory", parent_id),
            )),
            Some(_) => Ok(()),
        }
    }
}

impl<'a> CategoryManagerTrait for CategoryManager<'a> {
    /// Lists categories in insertion order.
    fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT id, name, color, parent_id FROM {} ORDER BY rowid",
                self.table()
            ))
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_category)
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| CategoryError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    fn get_category(&self, id: &str) -> Result<Category, CategoryError> {
        self.find(id)?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))
    }

    fn add_category(&mut self, category: NewCategory) -> Result<Category, CategoryError> {
        if let Some(pid) = category.parent_id.as_deref() {
            self.validate_parent(pid)?;
        }

        let stored = Category {
            id: Uuid::new_v4().to_string(),
            name: category.name,
            color: category.color,
            parent_id: category.parent_id,
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, name, color, parent_id) VALUES (?1, ?2, ?3, ?4)",
                    self.table()
                ),
                params![stored.id, stored.name, stored.color, stored.parent_id],
            )
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        tracing::info!(table = self.table(), id = %stored.id, name = %stored.name, "category added");
        Ok(stored)
    }

    fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Result<Category, CategoryError> {
        let mut category = self.get_category(id)?;

        if let Some(Some(pid)) = patch.parent_id.as_ref() {
            if pid == id {
                return Err(CategoryError::InvalidParent(
                    "a category cannot be its own parent".to_string(),
                ));
            }
            self.validate_parent(pid)?;
            if self.has_children(id)? {
                return Err(CategoryError::InvalidParent(format!(
                    "{} has subcategories and cannot be nested",
                    id
                )));
            }
        }

        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        if let Some(parent_id) = patch.parent_id {
            category.parent_id = parent_id;
        }

        self.conn
            .execute(
                &format!(
                    "UPDATE {} SET name = ?1, color = ?2, parent_id = ?3 WHERE id = ?4",
                    self.table()
                ),
                params![category.name, category.color, category.parent_id, id],
            )
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        tracing::info!(table = self.table(), id, "category updated");
        Ok(category)
    }

    /// Deletes a category.
    ///
    /// Items filed under it become uncategorized and its children move to the
    /// top level. Deleting an unknown id is a no-op.
    fn delete_category(&mut self, id: &str) -> Result<(), CategoryError> {
        self.conn
            .execute(
                &format!(
                    "UPDATE {} SET category_id = NULL WHERE category_id = ?1",
                    self.kind.item_table()
                ),
                params![id],
            )
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        self.conn
            .execute(
                &format!("UPDATE {} SET parent_id = NULL WHERE parent_id = ?1", self.table()),
                params![id],
            )
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        self.conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", self.table()), params![id])
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        tracing::info!(table = self.table(), id, "category deleted");
        Ok(())
    }

    fn count_categories(&self) -> Result<usize, CategoryError> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table()), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as usize)
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))
    }
}
