//! Unit tests for the Category Manager (video and link category tables).

use rstest::rstest;

use reelshelf::database::Database;
use reelshelf::managers::category_manager::{CategoryManager, CategoryManagerTrait};
use reelshelf::managers::link_manager::{LinkManager, LinkManagerTrait};
use reelshelf::managers::video_manager::{VideoManager, VideoManagerTrait};
use reelshelf::types::category::{CategoryKind, CategoryPatch, NewCategory};
use reelshelf::types::errors::CategoryError;
use reelshelf::types::link::NewLink;
use reelshelf::types::video::NewVideo;

fn new_category(name: &str, parent: Option<&str>) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        color: "10 20% 30%".to_string(),
        parent_id: parent.map(str::to_string),
    }
}

#[rstest]
#[case(CategoryKind::Video, &["Music", "Education", "Entertainment"])]
#[case(CategoryKind::Link, &["Articles", "Tools", "Reference"])]
fn fresh_database_lists_seeded_categories(#[case] kind: CategoryKind, #[case] names: &[&str]) {
    let db = Database::open_in_memory().unwrap();
    let mgr = CategoryManager::new(db.connection(), kind);
    let listed: Vec<String> = mgr.list_categories().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(listed, names);
    assert_eq!(mgr.count_categories().unwrap(), 3);
    assert_eq!(mgr.kind(), kind);
}

#[test]
fn add_appends_in_source_order() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());
    let added = mgr.add_category(new_category("Cooking", None)).unwrap();

    assert!(!added.id.is_empty());
    let all = mgr.list_categories().unwrap();
    assert_eq!(all.last().unwrap(), &added);
    assert_eq!(mgr.get_category(&added.id).unwrap(), added);
}

#[test]
fn add_child_under_top_level_parent() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());
    let parent = mgr.add_category(new_category("Sports", None)).unwrap();
    let child = mgr
        .add_category(new_category("Football", Some(&parent.id)))
        .unwrap();
    assert_eq!(child.parent_id.as_deref(), Some(parent.id.as_str()));
}

#[test]
fn add_rejects_missing_or_nested_parent() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());

    let err = mgr.add_category(new_category("Orphan", Some("nope"))).unwrap_err();
    assert!(matches!(err, CategoryError::InvalidParent(_)));

    let parent = mgr.add_category(new_category("A", None)).unwrap();
    let child = mgr.add_category(new_category("B", Some(&parent.id))).unwrap();
    let err = mgr
        .add_category(new_category("C", Some(&child.id)))
        .unwrap_err();
    assert!(matches!(err, CategoryError::InvalidParent(_)));
}

#[test]
fn update_changes_only_given_fields() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::links(db.connection());
    let cat = mgr.add_category(new_category("Docs", None)).unwrap();

    let updated = mgr
        .update_category(
            &cat.id,
            CategoryPatch {
                name: Some("Documentation".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Documentation");
    assert_eq!(updated.color, cat.color);
    assert_eq!(mgr.get_category(&cat.id).unwrap(), updated);
}

#[test]
fn update_can_move_to_top_level() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());
    let parent = mgr.add_category(new_category("P", None)).unwrap();
    let child = mgr.add_category(new_category("C", Some(&parent.id))).unwrap();

    let moved = mgr
        .update_category(
            &child.id,
            CategoryPatch {
                parent_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(moved.parent_id.is_none());
}

#[test]
fn update_rejects_self_parent_and_nesting_a_parent() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());
    let a = mgr.add_category(new_category("A", None)).unwrap();
    let b = mgr.add_category(new_category("B", None)).unwrap();
    mgr.add_category(new_category("A1", Some(&a.id))).unwrap();

    let self_parent = CategoryPatch {
        parent_id: Some(Some(a.id.clone())),
        ..Default::default()
    };
    assert!(matches!(
        mgr.update_category(&a.id, self_parent),
        Err(CategoryError::InvalidParent(_))
    ));

    // `a` has a child, so it cannot become a child itself.
    let nest = CategoryPatch {
        parent_id: Some(Some(b.id.clone())),
        ..Default::default()
    };
    assert!(matches!(
        mgr.update_category(&a.id, nest),
        Err(CategoryError::InvalidParent(_))
    ));
}

#[test]
fn update_missing_category_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());
    let err = mgr
        .update_category("missing", CategoryPatch::default())
        .unwrap_err();
    assert!(matches!(err, CategoryError::NotFound(_)));
}

#[test]
fn delete_uncategorizes_items_and_promotes_children() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let mut cats = CategoryManager::videos(conn);
    let parent = cats.add_category(new_category("Parent", None)).unwrap();
    let child = cats.add_category(new_category("Child", Some(&parent.id))).unwrap();

    let mut videos = VideoManager::new(conn);
    let v = videos
        .add_video(NewVideo {
            title: "T".to_string(),
            url: "https://youtu.be/x".to_string(),
            category_id: Some(parent.id.clone()),
            ..Default::default()
        })
        .unwrap();

    cats.delete_category(&parent.id).unwrap();

    assert!(matches!(cats.get_category(&parent.id), Err(CategoryError::NotFound(_))));
    assert!(cats.get_category(&child.id).unwrap().parent_id.is_none());
    let v = videos.get_video(&v.id).unwrap();
    assert!(v.category_id.is_none(), "video must survive as uncategorized");
}

#[test]
fn delete_link_category_only_touches_links() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let mut link_cats = CategoryManager::links(conn);
    let cat = link_cats.add_category(new_category("Temp", None)).unwrap();

    let mut links = LinkManager::new(conn);
    let l = links
        .add_link(NewLink {
            title: "Rust".to_string(),
            url: "https://rust-lang.org".to_string(),
            category_id: Some(cat.id.clone()),
            ..Default::default()
        })
        .unwrap();

    link_cats.delete_category(&cat.id).unwrap();
    assert!(links.get_link(&l.id).unwrap().category_id.is_none());
    assert_eq!(CategoryManager::videos(conn).count_categories().unwrap(), 3);
}

#[test]
fn delete_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let mut mgr = CategoryManager::videos(db.connection());
    assert!(mgr.delete_category("never-existed").is_ok());
    assert_eq!(mgr.count_categories().unwrap(), 3);
}
