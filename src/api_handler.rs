//! Action dispatch for the ReelShelf JSON API.
//!
//! The action string is parsed once into [`Action`], the body into the
//! matching [`ApiRequest`] variant, and dispatch is a single `match`. Both
//! the HTTP server and the stdio RPC binary go through [`dispatch`].

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::{App, AppState};
use crate::managers::category_manager::{CategoryManager, CategoryManagerTrait};
use crate::managers::link_manager::{LinkManager, LinkManagerTrait};
use crate::managers::share_manager::{ShareManager, ShareManagerTrait};
use crate::managers::video_manager::{VideoManager, VideoManagerTrait};
use crate::services::backup_service::{backup_filename, BackupService, BackupServiceTrait};
use crate::types::backup::ExportData;
use crate::types::category::{CategoryKind, CategoryPatch, NewCategory};
use crate::types::errors::ApiError;
use crate::types::link::{LinkPatch, NewLink};
use crate::types::share::ShareSettingsPatch;
use crate::types::video::{NewVideo, VideoPatch};

/// Every operation the API understands, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetVideos,
    GetCategories,
    AddVideo,
    UpdateVideo,
    DeleteVideo,
    AddCategory,
    UpdateCategory,
    DeleteCategory,
    GetLinks,
    GetLinkCategories,
    AddLink,
    UpdateLink,
    DeleteLink,
    AddLinkCategory,
    UpdateLinkCategory,
    DeleteLinkCategory,
    FetchTitle,
    GetStats,
    ExportData,
    ImportData,
    GetShareSettings,
    UpdateShareSettings,
    GetPublicCollection,
}

impl Action {
    pub const ALL: [Action; 23] = [
        Action::GetVideos,
        Action::GetCategories,
        Action::AddVideo,
        Action::UpdateVideo,
        Action::DeleteVideo,
        Action::AddCategory,
        Action::UpdateCategory,
        Action::DeleteCategory,
        Action::GetLinks,
        Action::GetLinkCategories,
        Action::AddLink,
        Action::UpdateLink,
        Action::DeleteLink,
        Action::AddLinkCategory,
        Action::UpdateLinkCategory,
        Action::DeleteLinkCategory,
        Action::FetchTitle,
        Action::GetStats,
        Action::ExportData,
        Action::ImportData,
        Action::GetShareSettings,
        Action::UpdateShareSettings,
        Action::GetPublicCollection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::GetVideos => "getVideos",
            Action::GetCategories => "getCategories",
            Action::AddVideo => "addVideo",
            Action::UpdateVideo => "updateVideo",
            Action::DeleteVideo => "deleteVideo",
            Action::AddCategory => "addCategory",
            Action::UpdateCategory => "updateCategory",
            Action::DeleteCategory => "deleteCategory",
            Action::GetLinks => "getLinks",
            Action::GetLinkCategories => "getLinkCategories",
            Action::AddLink => "addLink",
            Action::UpdateLink => "updateLink",
            Action::DeleteLink => "deleteLink",
            Action::AddLinkCategory => "addLinkCategory",
            Action::UpdateLinkCategory => "updateLinkCategory",
            Action::DeleteLinkCategory => "deleteLinkCategory",
            Action::FetchTitle => "fetchTitle",
            Action::GetStats => "getStats",
            Action::ExportData => "exportData",
            Action::ImportData => "importData",
            Action::GetShareSettings => "getShareSettings",
            Action::UpdateShareSettings => "updateShareSettings",
            Action::GetPublicCollection => "getPublicCollection",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or(ApiError::InvalidAction)
    }
}

/// A fully parsed API request.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    GetVideos,
    GetCategories,
    AddVideo(NewVideo),
    UpdateVideo { id: String, patch: VideoPatch },
    DeleteVideo { id: String },
    AddCategory(NewCategory),
    UpdateCategory { id: String, patch: CategoryPatch },
    DeleteCategory { id: String },
    GetLinks,
    GetLinkCategories,
    AddLink(NewLink),
    UpdateLink { id: String, patch: LinkPatch },
    DeleteLink { id: String },
    AddLinkCategory(NewCategory),
    UpdateLinkCategory { id: String, patch: CategoryPatch },
    DeleteLinkCategory { id: String },
    FetchTitle { url: String },
    GetStats,
    ExportData,
    ImportData(ExportData),
    GetShareSettings,
    UpdateShareSettings(ShareSettingsPatch),
    GetPublicCollection { slug: String },
}

#[derive(Deserialize)]
struct IdBody {
    id: String,
}

#[derive(Deserialize)]
struct UrlBody {
    url: String,
}

#[derive(Deserialize)]
struct SlugBody {
    slug: String,
}

fn payload<T: DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    T::deserialize(body).map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

fn id_of(body: &Value) -> Result<String, ApiError> {
    let IdBody { id } = payload(body)?;
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest("Invalid request body: empty id".to_string()));
    }
    Ok(id)
}

impl ApiRequest {
    /// Builds the request for `action` from its JSON body. Body-less actions ignore `body`.
    pub fn parse(action: Action, body: &Value) -> Result<Self, ApiError> {
        Ok(match action {
            Action::GetVideos => ApiRequest::GetVideos,
            Action::GetCategories => ApiRequest::GetCategories,
            Action::AddVideo => ApiRequest::AddVideo(payload(body)?),
            Action::UpdateVideo => ApiRequest::UpdateVideo {
                id: id_of(body)?,
                patch: payload(body)?,
            },
            Action::DeleteVideo => ApiRequest::DeleteVideo { id: id_of(body)? },
            Action::AddCategory => ApiRequest::AddCategory(payload(body)?),
            Action::UpdateCategory => ApiRequest::UpdateCategory {
                id: id_of(body)?,
                patch: payload(body)?,
            },
            Action::DeleteCategory => ApiRequest::DeleteCategory { id: id_of(body)? },
            Action::GetLinks => ApiRequest::GetLinks,
            Action::GetLinkCategories => ApiRequest::GetLinkCategories,
            Action::AddLink => ApiRequest::AddLink(payload(body)?),
            Action::UpdateLink => ApiRequest::UpdateLink {
                id: id_of(body)?,
                patch: payload(body)?,
            },
            Action::DeleteLink => ApiRequest::DeleteLink { id: id_of(body)? },
            Action::AddLinkCategory => ApiRequest::AddLinkCategory(payload(body)?),
            Action::UpdateLinkCategory => ApiRequest::UpdateLinkCategory {
                id: id_of(body)?,
                patch: payload(body)?,
            },
            Action::DeleteLinkCategory => ApiRequest::DeleteLinkCategory { id: id_of(body)? },
            Action::FetchTitle => {
                let UrlBody { url } = payload(body)?;
                ApiRequest::FetchTitle { url }
            }
            Action::GetStats => ApiRequest::GetStats,
            Action::ExportData => ApiRequest::ExportData,
            Action::ImportData => ApiRequest::ImportData(payload(body)?),
            Action::GetShareSettings => ApiRequest::GetShareSettings,
            Action::UpdateShareSettings => ApiRequest::UpdateShareSettings(payload(body)?),
            Action::GetPublicCollection => {
                let SlugBody { slug } = payload(body)?;
                ApiRequest::GetPublicCollection { slug }
            }
        })
    }

    pub fn action(&self) -> Action {
        match self {
            ApiRequest::GetVideos => Action::GetVideos,
            ApiRequest::GetCategories => Action::GetCategories,
            ApiRequest::AddVideo(_) => Action::AddVideo,
            ApiRequest::UpdateVideo { .. } => Action::UpdateVideo,
            ApiRequest::DeleteVideo { .. } => Action::DeleteVideo,
            ApiRequest::AddCategory(_) => Action::AddCategory,
            ApiRequest::UpdateCategory { .. } => Action::UpdateCategory,
            ApiRequest::DeleteCategory { .. } => Action::DeleteCategory,
            ApiRequest::GetLinks => Action::GetLinks,
            ApiRequest::GetLinkCategories => Action::GetLinkCategories,
            ApiRequest::AddLink(_) => Action::AddLink,
            ApiRequest::UpdateLink { .. } => Action::UpdateLink,
            ApiRequest::DeleteLink { .. } => Action::DeleteLink,
            ApiRequest::AddLinkCategory(_) => Action::AddLinkCategory,
            ApiRequest::UpdateLinkCategory { .. } => Action::UpdateLinkCategory,
            ApiRequest::DeleteLinkCategory { .. } => Action::DeleteLinkCategory,
            ApiRequest::FetchTitle { .. } => Action::FetchTitle,
            ApiRequest::GetStats => Action::GetStats,
            ApiRequest::ExportData => Action::ExportData,
            ApiRequest::ImportData(_) => Action::ImportData,
            ApiRequest::GetShareSettings => Action::GetShareSettings,
            ApiRequest::UpdateShareSettings(_) => Action::UpdateShareSettings,
            ApiRequest::GetPublicCollection { .. } => Action::GetPublicCollection,
        }
    }
}

/// Parses the action discriminator and body in one step.
pub fn parse_request(action: Option<&str>, body: &Value) -> Result<ApiRequest, ApiError> {
    let action: Action = action.unwrap_or_default().parse()?;
    ApiRequest::parse(action, body)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

fn title_failure(message: impl fmt::Display) -> Value {
    json!({"title": null, "error": message.to_string()})
}

/// Executes every request that only needs the database.
///
/// `FetchTitle` needs the network and goes through [`dispatch`]; here it
/// answers with the soft-failure shape.
pub fn handle_store_request(app: &Mutex<App>, request: ApiRequest) -> Result<Value, ApiError> {
    let guard = app.lock().map_err(|e| ApiError::Internal(e.to_string()))?;
    let conn = guard.database()?.connection();

    match request {
        // ─── Videos ───
        ApiRequest::GetVideos => {
            let videos = VideoManager::new(conn).list_videos()?;
            Ok(json!({ "videos": to_json(&videos)? }))
        }
        ApiRequest::AddVideo(new_video) => {
            let video = VideoManager::new(conn).add_video(new_video)?;
            Ok(json!({ "video": to_json(&video)? }))
        }
        ApiRequest::UpdateVideo { id, patch } => {
            let video = VideoManager::new(conn).update_video(&id, patch)?;
            Ok(json!({ "video": to_json(&video)? }))
        }
        ApiRequest::DeleteVideo { id } => {
            VideoManager::new(conn).delete_video(&id)?;
            Ok(json!({ "success": true }))
        }

        // ─── Categories ───
        ApiRequest::GetCategories => list_categories(conn, CategoryKind::Video),
        ApiRequest::GetLinkCategories => list_categories(conn, CategoryKind::Link),
        ApiRequest::AddCategory(new_category) => {
            add_category(conn, CategoryKind::Video, new_category)
        }
        ApiRequest::AddLinkCategory(new_category) => {
            add_category(conn, CategoryKind::Link, new_category)
        }
        ApiRequest::UpdateCategory { id, patch } => {
            update_category(conn, CategoryKind::Video, &id, patch)
        }
        ApiRequest::UpdateLinkCategory { id, patch } => {
            update_category(conn, CategoryKind::Link, &id, patch)
        }
        ApiRequest::DeleteCategory { id } => delete_category(conn, CategoryKind::Video, &id),
        ApiRequest::DeleteLinkCategory { id } => delete_category(conn, CategoryKind::Link, &id),

        // ─── Links ───
        ApiRequest::GetLinks => {
            let links = LinkManager::new(conn).list_links()?;
            Ok(json!({ "links": to_json(&links)? }))
        }
        ApiRequest::AddLink(new_link) => {
            let link = LinkManager::new(conn).add_link(new_link)?;
            Ok(json!({ "link": to_json(&link)? }))
        }
        ApiRequest::UpdateLink { id, patch } => {
            let link = LinkManager::new(conn).update_link(&id, patch)?;
            Ok(json!({ "link": to_json(&link)? }))
        }
        ApiRequest::DeleteLink { id } => {
            LinkManager::new(conn).delete_link(&id)?;
            Ok(json!({ "success": true }))
        }

        ApiRequest::FetchTitle { .. } => Ok(title_failure("Title lookup is not available")),

        // ─── Backup ───
        ApiRequest::GetStats => {
            let stats = BackupService::new(conn).stats()?;
            to_json(&stats)
        }
        ApiRequest::ExportData => {
            let backup = BackupService::new(conn).export()?;
            let filename = backup_filename(Utc::now().date_naive());
            Ok(json!({ "backup": to_json(&backup)?, "filename": filename }))
        }
        ApiRequest::ImportData(data) => {
            let report = BackupService::new(conn).import(data)?;
            to_json(&report)
        }

        // ─── Sharing ───
        ApiRequest::GetShareSettings => {
            let settings = ShareManager::new(conn).get_settings()?;
            Ok(json!({ "settings": to_json(&settings)? }))
        }
        ApiRequest::UpdateShareSettings(patch) => {
            let settings = ShareManager::new(conn).update_settings(patch)?;
            Ok(json!({ "settings": to_json(&settings)? }))
        }
        ApiRequest::GetPublicCollection { slug } => {
            let collection = ShareManager::new(conn).public_collection(&slug)?;
            to_json(&collection)
        }
    }
}

fn list_categories(conn: &rusqlite::Connection, kind: CategoryKind) -> Result<Value, ApiError> {
    let categories = CategoryManager::new(conn, kind).list_categories()?;
    Ok(json!({ "categories": to_json(&categories)? }))
}

fn add_category(
    conn: &rusqlite::Connection,
    kind: CategoryKind,
    new_category: NewCategory,
) -> Result<Value, ApiError> {
    let category = CategoryManager::new(conn, kind).add_category(new_category)?;
    Ok(json!({ "category": to_json(&category)? }))
}

fn update_category(
    conn: &rusqlite::Connection,
    kind: CategoryKind,
    id: &str,
    patch: CategoryPatch,
) -> Result<Value, ApiError> {
    let category = CategoryManager::new(conn, kind).update_category(id, patch)?;
    Ok(json!({ "category": to_json(&category)? }))
}

fn delete_category(
    conn: &rusqlite::Connection,
    kind: CategoryKind,
    id: &str,
) -> Result<Value, ApiError> {
    CategoryManager::new(conn, kind).delete_category(id)?;
    Ok(json!({ "success": true }))
}

/// Executes a request against shared state. The title fetch runs without
/// holding the app lock and never fails the request. Store requests run on
/// the blocking pool.
pub async fn dispatch(state: &AppState, request: ApiRequest) -> Result<Value, ApiError> {
    let action = request.action();
    tracing::info!(%action, "dispatching");

    let result = match request {
        ApiRequest::FetchTitle { url } => match state.title_fetcher.fetch_title(&url).await {
            Ok(title) => Ok(json!({ "title": title })),
            Err(e) => {
                tracing::warn!(%url, error = %e, "title fetch failed");
                Ok(title_failure(e))
            }
        },
        other => {
            let app = Arc::clone(&state.app);
            tokio::task::spawn_blocking(move || handle_store_request(&app, other))
                .await
                .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))
                .and_then(|result| result)
        }
    };

    if let Err(err) = &result {
        if err.status_code() >= 500 {
            tracing::error!(%action, error = %err, "request failed");
        } else {
            tracing::warn!(%action, error = %err, "request rejected");
        }
    }
    result
}
