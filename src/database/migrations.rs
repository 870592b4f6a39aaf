//! Schema migrations for the ReelShelf SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::{params, Connection};

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Categories seeded into an empty `categories` table.
pub const DEFAULT_VIDEO_CATEGORIES: [(&str, &str, &str); 3] = [
    ("11111111-1111-1111-1111-111111111111", "Music", "340 82% 52%"),
    ("22222222-2222-2222-2222-222222222222", "Education", "200 98% 39%"),
    ("33333333-3333-3333-3333-333333333333", "Entertainment", "262 83% 58%"),
];

/// Categories seeded into an empty `link_categories` table.
pub const DEFAULT_LINK_CATEGORIES: [(&str, &str, &str); 3] = [
    ("aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa", "Articles", "220 70% 50%"),
    ("bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb", "Tools", "150 60% 45%"),
    ("cccccccc-cccc-cccc-cccc-cccccccccccc", "Reference", "35 90% 55%"),
];

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at TEXT NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: videos and categories")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Video channel/tags columns, links and link_categories")?;
    }

    if current < 3 {
        migration_v3(conn)?;
        record_version(conn, 3, "Category parents, descriptions, share settings")?;
    }

    if current < CURRENT_SCHEMA_VERSION {
        tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "schema migrated");
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, now, description],
    )?;
    Ok(())
}

/// Returns true if `table` already has `column`.
fn has_column(conn: &Connection, table: &str, column: &str) -> bool {
    conn.prepare(&format!("SELECT {} FROM {} LIMIT 0", column, table))
        .is_ok()
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), rusqlite::Error> {
    if !has_column(conn, table, column) {
        conn.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {} {};",
            table, column, definition
        ))?;
    }
    Ok(())
}

/// V1: the first released schema.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS videos (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            thumbnail_url TEXT,
            category_id TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL
        );
        ",
    )
}

/// V2: channel metadata and tags on videos; the links side of the collection.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    add_column_if_missing(conn, "videos", "channel_name", "TEXT")?;
    add_column_if_missing(conn, "videos", "channel_url", "TEXT")?;
    add_column_if_missing(conn, "videos", "tags", "TEXT NOT NULL DEFAULT '[]'")?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS links (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            favicon TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS link_categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL
        );
        ",
    )?;

    add_column_if_missing(conn, "links", "category_id", "TEXT")
}

/// V3: one-level category nesting, descriptions and public sharing.
fn migration_v3(conn: &Connection) -> Result<(), rusqlite::Error> {
    add_column_if_missing(conn, "categories", "parent_id", "TEXT")?;
    add_column_if_missing(conn, "link_categories", "parent_id", "TEXT")?;
    add_column_if_missing(conn, "videos", "description", "TEXT")?;
    add_column_if_missing(conn, "links", "description", "TEXT")?;

    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_videos_category ON videos(category_id);
        CREATE INDEX IF NOT EXISTS idx_links_category ON links(category_id);

        CREATE TABLE IF NOT EXISTS share_settings (
            id TEXT PRIMARY KEY DEFAULT 'default',
            display_name TEXT,
            is_public INTEGER NOT NULL DEFAULT 0,
            share_videos INTEGER NOT NULL DEFAULT 1,
            share_links INTEGER NOT NULL DEFAULT 1,
            public_slug TEXT UNIQUE
        );
        ",
    )
}

/// Seeds the default categories into each category table that is empty.
pub fn seed_defaults(conn: &Connection) -> Result<(), rusqlite::Error> {
    seed_table(conn, "categories", &DEFAULT_VIDEO_CATEGORIES)?;
    seed_table(conn, "link_categories", &DEFAULT_LINK_CATEGORIES)
}

fn seed_table(
    conn: &Connection,
    table: &str,
    rows: &[(&str, &str, &str)],
) -> Result<(), rusqlite::Error> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    if count > 0 {
        return Ok(());
    }
    for (id, name, color) in rows {
        conn.execute(
            &format!("INSERT INTO {} (id, name, color) VALUES (?1, ?2, ?3)", table),
            params![id, name, color],
        )?;
    }
    tracing::info!(table, "seeded default categories");
    Ok(())
}
