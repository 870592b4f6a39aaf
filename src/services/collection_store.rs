//! Client-side cache of a ReelShelf collection.
//!
//! [`CollectionStore`] owns the four collections and talks to the API only
//! through a [`CollectionBackend`]. `load` replaces everything at once;
//! each mutation waits for the server's record before touching the cache,
//! so local state never runs ahead of the store. Search, platform and
//! category filters and pagination are derived from the cached lists.

use std::ops::RangeInclusive;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::category_tree::CategorySelection;
use super::platform_detector::detect_platform;
use crate::api_handler::{handle_store_request, ApiRequest};
use crate::app::App;
use crate::types::category::{Category, CategoryKind, CategoryPatch, NewCategory};
use crate::types::errors::ApiError;
use crate::types::link::{Link, LinkPatch, NewLink};
use crate::types::platform::Platform;
use crate::types::video::{NewVideo, Video, VideoPatch};

/// Items per page in a collection grid.
pub const PAGE_SIZE: usize = 8;

/// Number of page buttons shown around the current page.
pub const PAGE_WINDOW: usize = 5;

/// Anything that can execute API requests for the store.
pub trait CollectionBackend {
    fn execute(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

impl CollectionBackend for Mutex<App> {
    fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        handle_store_request(self, request)
    }
}

impl<B: CollectionBackend + ?Sized> CollectionBackend for std::sync::Arc<B> {
    fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        (**self).execute(request)
    }
}

fn field<T: DeserializeOwned>(mut response: Value, key: &str) -> Result<T, ApiError> {
    let value = response
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::Internal(format!("Unexpected response: missing '{}'", key)))?;
    serde_json::from_value(value)
        .map_err(|e| ApiError::Internal(format!("Unexpected response for '{}': {}", key, e)))
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Page numbers to render as buttons.
    pub window: RangeInclusive<usize>,
}

/// Page numbers shown around `current`: at most [`PAGE_WINDOW`], shifted
/// left near the end so the window stays full when enough pages exist.
pub fn page_window(current: usize, total_pages: usize) -> RangeInclusive<usize> {
    if total_pages == 0 {
        return 1..=0;
    }
    let mut start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total_pages);
    if end + 1 - start < PAGE_WINDOW {
        start = (end + 1).saturating_sub(PAGE_WINDOW).max(1);
    }
    start..=end
}

/// Slices `items` into page `page` (1-based). A page past the end falls back to page 1.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE);
    let page = if page == 0 || (page > total_pages && total_pages > 0) {
        1
    } else {
        page
    };
    let start = ((page - 1) * PAGE_SIZE).min(total_items);
    let end = (start + PAGE_SIZE).min(total_items);
    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
        window: page_window(page, total_pages),
    }
}

/// Filter and paging state of one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search: String,
    pub category: CategorySelection,
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategorySelection::All,
            page: 1,
        }
    }
}

impl ViewState {
    fn query(&self) -> Option<String> {
        let q = self.search.trim().to_lowercase();
        if q.is_empty() {
            None
        } else {
            Some(q)
        }
    }
}

fn tags_match(tags: &[String], query: &str) -> bool {
    tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// Cached collections plus view state.
pub struct CollectionStore<B: CollectionBackend> {
    backend: B,
    videos: Vec<Video>,
    video_categories: Vec<Category>,
    links: Vec<Link>,
    link_categories: Vec<Category>,
    video_view: ViewState,
    platform: Option<Platform>,
    link_view: ViewState,
}

impl<B: CollectionBackend> CollectionStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            videos: Vec::new(),
            video_categories: Vec::new(),
            links: Vec::new(),
            link_categories: Vec::new(),
            video_view: ViewState::default(),
            platform: None,
            link_view: ViewState::default(),
        }
    }

    /// Fetches all four collections and replaces the cache. Nothing is
    /// replaced unless every fetch succeeds.
    pub fn load(&mut self) -> Result<(), ApiError> {
        let videos: Vec<Video> = field(self.backend.execute(ApiRequest::GetVideos)?, "videos")?;
        let video_categories: Vec<Category> =
            field(self.backend.execute(ApiRequest::GetCategories)?, "categories")?;
        let links: Vec<Link> = field(self.backend.execute(ApiRequest::GetLinks)?, "links")?;
        let link_categories: Vec<Category> =
            field(self.backend.execute(ApiRequest::GetLinkCategories)?, "categories")?;

        self.videos = videos;
        self.video_categories = video_categories;
        self.links = links;
        self.link_categories = link_categories;
        Ok(())
    }

    /// Same as [`load`](Self::load); kept as the name callers use after an import.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        self.load()
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn categories(&self, kind: CategoryKind) -> &[Category] {
        match kind {
            CategoryKind::Video => &self.video_categories,
            CategoryKind::Link => &self.link_categories,
        }
    }

    fn categories_mut(&mut self, kind: CategoryKind) -> &mut Vec<Category> {
        match kind {
            CategoryKind::Video => &mut self.video_categories,
            CategoryKind::Link => &mut self.link_categories,
        }
    }

    // ─── Videos ───

    pub fn add_video(&mut self, video: NewVideo) -> Result<Video, ApiError> {
        let created: Video = field(self.backend.execute(ApiRequest::AddVideo(video))?, "video")?;
        self.videos.insert(0, created.clone());
        Ok(created)
    }

    pub fn update_video(&mut self, id: &str, patch: VideoPatch) -> Result<Video, ApiError> {
        let request = ApiRequest::UpdateVideo {
            id: id.to_string(),
            patch,
        };
        let updated: Video = field(self.backend.execute(request)?, "video")?;
        if let Some(slot) = self.videos.iter_mut().find(|v| v.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub fn delete_video(&mut self, id: &str) -> Result<(), ApiError> {
        self.backend.execute(ApiRequest::DeleteVideo { id: id.to_string() })?;
        self.videos.retain(|v| v.id != id);
        Ok(())
    }

    // ─── Links ───

    pub fn add_link(&mut self, link: NewLink) -> Result<Link, ApiError> {
        let created: Link = field(self.backend.execute(ApiRequest::AddLink(link))?, "link")?;
        self.links.insert(0, created.clone());
        Ok(created)
    }

    pub fn update_link(&mut self, id: &str, patch: LinkPatch) -> Result<Link, ApiError> {
        let request = ApiRequest::UpdateLink {
            id: id.to_string(),
            patch,
        };
        let updated: Link = field(self.backend.execute(request)?, "link")?;
        if let Some(slot) = self.links.iter_mut().find(|l| l.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub fn delete_link(&mut self, id: &str) -> Result<(), ApiError> {
        self.backend.execute(ApiRequest::DeleteLink { id: id.to_string() })?;
        self.links.retain(|l| l.id != id);
        Ok(())
    }

    // ─── Categories ───

    pub fn add_category(
        &mut self,
        kind: CategoryKind,
        category: NewCategory,
    ) -> Result<Category, ApiError> {
        let request = match kind {
            CategoryKind::Video => ApiRequest::AddCategory(category),
            CategoryKind::Link => ApiRequest::AddLinkCategory(category),
        };
        let created: Category = field(self.backend.execute(request)?, "category")?;
        self.categories_mut(kind).push(created.clone());
        Ok(created)
    }

    pub fn update_category(
        &mut self,
        kind: CategoryKind,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Category, ApiError> {
        let id = id.to_string();
        let request = match kind {
            CategoryKind::Video => ApiRequest::UpdateCategory { id, patch },
            CategoryKind::Link => ApiRequest::UpdateLinkCategory { id, patch },
        };
        let updated: Category = field(self.backend.execute(request)?, "category")?;
        if let Some(slot) = self
            .categories_mut(kind)
            .iter_mut()
            .find(|c| c.id == updated.id)
        {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Deletes a category, then mirrors the server locally: its items become
    /// uncategorized, its children move to the top level and a selection
    /// pointing at it is cleared.
    pub fn delete_category(&mut self, kind: CategoryKind, id: &str) -> Result<(), ApiError> {
        let request = match kind {
            CategoryKind::Video => ApiRequest::DeleteCategory { id: id.to_string() },
            CategoryKind::Link => ApiRequest::DeleteLinkCategory { id: id.to_string() },
        };
        self.backend.execute(request)?;

        let categories = self.categories_mut(kind);
        categories.retain(|c| c.id != id);
        for child in categories.iter_mut() {
            if child.parent_id.as_deref() == Some(id) {
                child.parent_id = None;
            }
        }

        let selected = CategorySelection::Category(id.to_string());
        match kind {
            CategoryKind::Video => {
                for video in self.videos.iter_mut() {
                    if video.category_id.as_deref() == Some(id) {
                        video.category_id = None;
                    }
                }
                if self.video_view.category == selected {
                    self.video_view.category = CategorySelection::All;
                }
            }
            CategoryKind::Link => {
                for link in self.links.iter_mut() {
                    if link.category_id.as_deref() == Some(id) {
                        link.category_id = None;
                    }
                }
                if self.link_view.category == selected {
                    self.link_view.category = CategorySelection::All;
                }
            }
        }
        Ok(())
    }

    // ─── View state ───

    fn view_mut(&mut self, kind: CategoryKind) -> &mut ViewState {
        match kind {
            CategoryKind::Video => &mut self.video_view,
            CategoryKind::Link => &mut self.link_view,
        }
    }

    pub fn view(&self, kind: CategoryKind) -> &ViewState {
        match kind {
            CategoryKind::Video => &self.video_view,
            CategoryKind::Link => &self.link_view,
        }
    }

    pub fn set_search(&mut self, kind: CategoryKind, query: &str) {
        let view = self.view_mut(kind);
        view.search = query.to_string();
        view.page = 1;
    }

    /// Selects a category filter; selecting the current one clears it.
    pub fn select_category(&mut self, kind: CategoryKind, selection: CategorySelection) {
        let view = self.view_mut(kind);
        view.category = view.category.toggle(selection);
        view.page = 1;
    }

    /// Selects a platform filter for videos; selecting the current one clears it.
    pub fn select_platform(&mut self, platform: Option<Platform>) {
        self.platform = if self.platform == platform { None } else { platform };
        self.video_view.page = 1;
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn set_page(&mut self, kind: CategoryKind, page: usize) {
        self.view_mut(kind).page = page;
    }

    /// Videos passing the search (title or tag), platform and category filters.
    pub fn filtered_videos(&self) -> Vec<Video> {
        let query = self.video_view.query();
        self.videos
            .iter()
            .filter(|v| {
                self.video_view
                    .category
                    .matches(*v, &self.video_categories)
            })
            .filter(|v| self.platform.map_or(true, |p| detect_platform(&v.url) == p))
            .filter(|v| match &query {
                Some(q) => v.title.to_lowercase().contains(q) || tags_match(&v.tags, q),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Links passing the search (title, URL or tag) and category filters.
    pub fn filtered_links(&self) -> Vec<Link> {
        let query = self.link_view.query();
        self.links
            .iter()
            .filter(|l| self.link_view.category.matches(*l, &self.link_categories))
            .filter(|l| match &query {
                Some(q) => {
                    l.title.to_lowercase().contains(q)
                        || l.url.to_lowercase().contains(q)
                        || tags_match(&l.tags, q)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn video_page(&self) -> Page<Video> {
        paginate(&self.filtered_videos(), self.video_view.page)
    }

    pub fn link_page(&self) -> Page<Link> {
        paginate(&self.filtered_links(), self.link_view.page)
    }

    /// Item count shown next to a category entry in the sidebar.
    pub fn category_count(&self, kind: CategoryKind, selection: &CategorySelection) -> usize {
        match kind {
            CategoryKind::Video => selection.count(&self.videos, &self.video_categories),
            CategoryKind::Link => selection.count(&self.links, &self.link_categories),
        }
    }
}
