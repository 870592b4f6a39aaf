//! Unit tests for the Link Manager.

use reelshelf::database::Database;
use reelshelf::managers::link_manager::{favicon_for, LinkManager, LinkManagerTrait};
use reelshelf::types::errors::LinkError;
use reelshelf::types::link::{LinkPatch, NewLink};

fn new_link(title: &str, url: &str) -> NewLink {
    NewLink {
        title: title.to_string(),
        url: url.to_string(),
        ..Default::default()
    }
}

#[test]
fn favicon_is_derived_from_host() {
    assert_eq!(
        favicon_for("https://docs.rs/tokio/latest").as_deref(),
        Some("https://www.google.com/s2/favicons?domain=docs.rs&sz=64")
    );
    assert!(favicon_for("not a url").is_none());
}

#[test]
fn add_fills_missing_favicon() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = LinkManager::new(db.connection());
    let link = mgr.add_link(new_link("Rust", "https://www.rust-lang.org/learn")).unwrap();
    assert_eq!(
        link.favicon.as_deref(),
        Some("https://www.google.com/s2/favicons?domain=www.rust-lang.org&sz=64")
    );

    let custom = mgr
        .add_link(NewLink {
            favicon: Some("https://example.com/icon.png".to_string()),
            ..new_link("Ex", "https://example.com")
        })
        .unwrap();
    assert_eq!(custom.favicon.as_deref(), Some("https://example.com/icon.png"));
}

#[test]
fn list_is_newest_first_and_counts() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = LinkManager::new(db.connection());
    let a = mgr.add_link(new_link("a", "https://a.example")).unwrap();
    let b = mgr.add_link(new_link("b", "https://b.example")).unwrap();

    let ids: Vec<String> = mgr.list_links().unwrap().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    assert_eq!(mgr.count_links().unwrap(), 2);
}

#[test]
fn update_merges_and_normalizes_tags() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = LinkManager::new(db.connection());
    let link = mgr
        .add_link(NewLink {
            description: Some("old".to_string()),
            ..new_link("Docs", "https://docs.rs")
        })
        .unwrap();

    let updated = mgr
        .update_link(
            &link.id,
            LinkPatch {
                title: Some("docs.rs".to_string()),
                description: Some(None),
                tags: Some(vec!["Crates".to_string(), " crates ".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "docs.rs");
    assert!(updated.description.is_none());
    assert_eq!(updated.tags, vec!["crates"]);
    assert_eq!(updated.url, "https://docs.rs");
    assert_eq!(mgr.get_link(&link.id).unwrap(), updated);
}

#[test]
fn update_missing_link_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = LinkManager::new(db.connection());
    assert!(matches!(
        mgr.update_link("ghost", LinkPatch::default()),
        Err(LinkError::NotFound(_))
    ));
}

#[test]
fn delete_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = LinkManager::new(db.connection());
    let link = mgr.add_link(new_link("x", "https://x.example")).unwrap();
    mgr.delete_link(&link.id).unwrap();
    mgr.delete_link(&link.id).unwrap();
    assert_eq!(mgr.count_links().unwrap(), 0);
}
