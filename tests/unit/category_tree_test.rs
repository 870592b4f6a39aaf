//! Unit tests for the category tree queries and selection state.

use reelshelf::services::category_tree::{
    count_for_category, count_uncategorized, direct_count, is_parent_active, parent_categories,
    subcategories, CategorySelection,
};
use reelshelf::types::category::Category;
use reelshelf::types::video::Video;

fn category(id: &str, parent: Option<&str>) -> Category {
    Category {
        id: id.to_string(),
        name: id.to_uppercase(),
        color: "0 0% 50%".to_string(),
        parent_id: parent.map(str::to_string),
    }
}

fn video(id: &str, category_id: Option<&str>) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {}", id),
        url: format!("https://youtu.be/{}", id),
        thumbnail_url: String::new(),
        description: None,
        channel_name: None,
        channel_url: None,
        category_id: category_id.map(str::to_string),
        tags: Vec::new(),
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

/// music → {rock, jazz}; education (no children); rock → grand (invalid, but tolerated).
fn tree() -> Vec<Category> {
    vec![
        category("music", None),
        category("rock", Some("music")),
        category("education", None),
        category("jazz", Some("music")),
        category("grand", Some("rock")),
    ]
}

#[test]
fn parents_and_children_keep_source_order() {
    let cats = tree();
    let parents: Vec<&str> = parent_categories(&cats).iter().map(|c| c.id.as_str()).collect();
    assert_eq!(parents, vec!["music", "education"]);

    let children: Vec<&str> = subcategories(&cats, "music").iter().map(|c| c.id.as_str()).collect();
    assert_eq!(children, vec!["rock", "jazz"]);

    assert!(subcategories(&cats, "education").is_empty());
    assert!(subcategories(&cats, "missing").is_empty());
}

#[test]
fn music_scenario_counts_children_but_not_grandchildren() {
    let cats = tree();
    let videos = vec![
        video("1", Some("music")),
        video("2", Some("rock")),
        video("3", Some("jazz")),
        video("4", Some("grand")),
        video("5", None),
        video("6", Some("education")),
    ];

    assert_eq!(direct_count(&videos, "music"), 1);
    assert_eq!(count_for_category(&videos, &cats, "music"), 3);
    assert_eq!(count_for_category(&videos, &cats, "rock"), 2);
    assert_eq!(count_for_category(&videos, &cats, "education"), 1);
    assert_eq!(count_for_category(&videos, &cats, "missing"), 0);
    assert_eq!(count_uncategorized(&videos), 1);
}

#[test]
fn selection_from_wire() {
    assert_eq!(CategorySelection::from_wire(None), CategorySelection::All);
    assert_eq!(
        CategorySelection::from_wire(Some("uncategorized")),
        CategorySelection::Uncategorized
    );
    assert_eq!(
        CategorySelection::from_wire(Some("music")),
        CategorySelection::Category("music".to_string())
    );
}

#[test]
fn selecting_the_selected_value_toggles_off() {
    let music = CategorySelection::Category("music".to_string());
    let jazz = CategorySelection::Category("jazz".to_string());

    let selected = CategorySelection::All.toggle(music.clone());
    assert_eq!(selected, music);
    assert_eq!(selected.toggle(music.clone()), CategorySelection::All);
    assert_eq!(selected.toggle(jazz.clone()), jazz);
    assert_eq!(
        CategorySelection::Uncategorized.toggle(CategorySelection::Uncategorized),
        CategorySelection::All
    );
}

#[test]
fn selected_parent_matches_children_items() {
    let cats = tree();
    let music = CategorySelection::Category("music".to_string());
    assert!(music.matches(&video("a", Some("music")), &cats));
    assert!(music.matches(&video("b", Some("jazz")), &cats));
    assert!(!music.matches(&video("c", Some("grand")), &cats));
    assert!(!music.matches(&video("d", None), &cats));

    assert!(CategorySelection::Uncategorized.matches(&video("e", None), &cats));
    assert!(CategorySelection::All.matches(&video("f", Some("education")), &cats));
}

#[test]
fn selection_count_agrees_with_matches() {
    let cats = tree();
    let videos = vec![
        video("1", Some("music")),
        video("2", Some("rock")),
        video("3", None),
    ];
    for selection in [
        CategorySelection::All,
        CategorySelection::Uncategorized,
        CategorySelection::Category("music".to_string()),
        CategorySelection::Category("rock".to_string()),
    ] {
        let matched = videos.iter().filter(|v| selection.matches(*v, &cats)).count();
        assert_eq!(selection.count(&videos, &cats), matched, "{:?}", selection);
    }
}

#[test]
fn parent_is_active_when_it_or_a_child_is_selected() {
    let cats = tree();
    assert!(is_parent_active(&CategorySelection::Category("music".into()), &cats, "music"));
    assert!(is_parent_active(&CategorySelection::Category("jazz".into()), &cats, "music"));
    assert!(!is_parent_active(&CategorySelection::Category("education".into()), &cats, "music"));
    assert!(!is_parent_active(&CategorySelection::All, &cats, "music"));
    assert!(!is_parent_active(&CategorySelection::Uncategorized, &cats, "music"));
}
