//! Unit tests for the ReelShelf database layer (connection + migrations).

use reelshelf::database::migrations::{
    self, CURRENT_SCHEMA_VERSION, DEFAULT_LINK_CATEGORIES, DEFAULT_VIDEO_CATEGORIES,
};
use reelshelf::database::Database;
use rusqlite::Connection;

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
        [name],
        |row| row.get(0),
    )
    .unwrap_or(false)
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in [
        "videos",
        "categories",
        "links",
        "link_categories",
        "share_settings",
        "schema_version",
    ] {
        assert!(table_exists(conn, table), "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for index in ["idx_videos_category", "idx_links_category"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    // Running migrations a second time should not fail or reseed
    assert!(db.migrate().is_ok());
    assert!(migrations::run_all(db.connection()).is_ok());
    assert_eq!(count(db.connection(), "categories"), 3);
    assert_eq!(count(db.connection(), "link_categories"), 3);
    assert_eq!(count(db.connection(), "schema_version"), CURRENT_SCHEMA_VERSION as i64);
}

#[test]
fn test_default_categories_are_seeded() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();

    let names: Vec<String> = conn
        .prepare("SELECT name FROM categories ORDER BY rowid")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    let expected: Vec<String> = DEFAULT_VIDEO_CATEGORIES
        .iter()
        .map(|(_, name, _)| name.to_string())
        .collect();
    assert_eq!(names, expected);
    assert_eq!(names, vec!["Music", "Education", "Entertainment"]);

    let music_color: String = conn
        .query_row(
            "SELECT color FROM categories WHERE name = 'Music'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(music_color, "340 82% 52%");

    let link_names: Vec<&str> = DEFAULT_LINK_CATEGORIES.iter().map(|(_, n, _)| *n).collect();
    assert_eq!(link_names, vec!["Articles", "Tools", "Reference"]);
    assert_eq!(count(conn, "link_categories"), 3);
}

#[test]
fn test_seeding_skips_tables_that_have_rows() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute("DELETE FROM categories", []).unwrap();
    conn.execute(
        "INSERT INTO categories (id, name, color) VALUES ('x', 'Mine', '1 1% 1%')",
        [],
    )
    .unwrap();

    db.migrate().unwrap();
    assert_eq!(count(conn, "categories"), 1);
}

#[test]
fn test_legacy_v1_database_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE videos (id TEXT PRIMARY KEY, title TEXT NOT NULL, url TEXT NOT NULL,
                 thumbnail_url TEXT, category_id TEXT, created_at TEXT NOT NULL);
             CREATE TABLE categories (id TEXT PRIMARY KEY, name TEXT NOT NULL, color TEXT NOT NULL);
             INSERT INTO videos VALUES ('v1', 'Old', 'https://youtu.be/abc', NULL, NULL,
                 '2023-01-01T00:00:00.000Z');",
        )
        .unwrap();
    }

    let db = Database::open(&path).expect("upgrade should succeed");
    let conn = db.connection();
    let tags: String = conn
        .query_row("SELECT tags FROM videos WHERE id = 'v1'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tags, "[]");
    assert!(conn.prepare("SELECT parent_id FROM categories").is_ok());
    assert!(conn.prepare("SELECT description, channel_name FROM videos").is_ok());
    assert!(table_exists(conn, "links"));
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("reelshelf.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open with file path should succeed");
    assert!(db_path.exists(), "Database file should exist on disk");
}
