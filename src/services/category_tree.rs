//! Category tree queries.
//!
//! Categories form a one-level hierarchy: a category may have a parent, and
//! that parent is always top-level. Everything here is a pure function over
//! slices already loaded from storage; ordering follows the input order.

use crate::types::category::Category;
use crate::types::link::Link;
use crate::types::video::Video;

/// Anything that can be filed under a category.
pub trait Categorized {
    fn category_id(&self) -> Option<&str>;
}

impl Categorized for Video {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

impl Categorized for Link {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

/// All top-level categories, in source order.
pub fn parent_categories(categories: &[Category]) -> Vec<&Category> {
    categories.iter().filter(|c| c.parent_id.is_none()).collect()
}

/// All direct children of `parent_id`, in source order.
pub fn subcategories<'a>(categories: &'a [Category], parent_id: &str) -> Vec<&'a Category> {
    categories
        .iter()
        .filter(|c| c.parent_id.as_deref() == Some(parent_id))
        .collect()
}

/// Number of items filed directly under `category_id`.
pub fn direct_count<T: Categorized>(items: &[T], category_id: &str) -> usize {
    items
        .iter()
        .filter(|item| item.category_id() == Some(category_id))
        .count()
}

/// Items filed under `category_id` or under one of its direct children.
/// Grandchildren are not counted.
pub fn count_for_category<T: Categorized>(
    items: &[T],
    categories: &[Category],
    category_id: &str,
) -> usize {
    let children: Vec<&str> = subcategories(categories, category_id)
        .into_iter()
        .map(|c| c.id.as_str())
        .collect();
    items
        .iter()
        .filter(|item| match item.category_id() {
            Some(id) => id == category_id || children.contains(&id),
            None => false,
        })
        .count()
}

/// Items with no category.
pub fn count_uncategorized<T: Categorized>(items: &[T]) -> usize {
    items.iter().filter(|item| item.category_id().is_none()).count()
}

/// The category filter currently applied to a collection view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    /// No filter.
    #[default]
    All,
    /// Only items without a category.
    Uncategorized,
    /// Only items in the given category (and its children).
    Category(String),
}

impl CategorySelection {
    /// Builds a selection from the wire form: `None`, `"uncategorized"` or an id.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            None => CategorySelection::All,
            Some("uncategorized") => CategorySelection::Uncategorized,
            Some(id) => CategorySelection::Category(id.to_string()),
        }
    }

    /// Selecting the value that is already selected turns the filter off.
    pub fn toggle(&self, next: CategorySelection) -> CategorySelection {
        if *self == next {
            CategorySelection::All
        } else {
            next
        }
    }

    /// True when `item` passes this filter. A selected parent also admits
    /// its children's items, matching [`count_for_category`].
    pub fn matches<T: Categorized>(&self, item: &T, categories: &[Category]) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Uncategorized => item.category_id().is_none(),
            CategorySelection::Category(selected) => match item.category_id() {
                None => false,
                Some(id) if id == selected => true,
                Some(id) => categories
                    .iter()
                    .any(|c| c.id == id && c.parent_id.as_deref() == Some(selected.as_str())),
            },
        }
    }

    /// Number of items this selection would show.
    pub fn count<T: Categorized>(&self, items: &[T], categories: &[Category]) -> usize {
        match self {
            CategorySelection::All => items.len(),
            CategorySelection::Uncategorized => count_uncategorized(items),
            CategorySelection::Category(id) => count_for_category(items, categories, id),
        }
    }
}

/// A parent looks active when it, or one of its children, is selected.
/// Display concern only.
pub fn is_parent_active(
    selection: &CategorySelection,
    categories: &[Category],
    parent_id: &str,
) -> bool {
    match selection {
        CategorySelection::Category(selected) => {
            selected == parent_id
                || subcategories(categories, parent_id)
                    .iter()
                    .any(|c| &c.id == selected)
        }
        _ => false,
    }
}
