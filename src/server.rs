//! HTTP front end: routes, CORS and the JSON error body.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api_handler::{dispatch, parse_request};
use crate::app::AppState;
use crate::services::auth_service::AuthServiceTrait;
use crate::types::auth::LoginRequest;
use crate::types::errors::ApiError;

const MAX_BODY_SIZE_10MB: usize = 10 * 1024 * 1024;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ActionQuery {
    action: Option<String>,
}

/// An empty body reads as `null`; anything else must be JSON.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

async fn api_videos(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    // Configuration problems are reported before the action is looked at.
    {
        let app = state
            .app
            .lock()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        app.database()?;
    }
    let body = parse_body(&body)?;
    let request = parse_request(query.action.as_deref(), &body)?;
    dispatch(&state, request).await.map(Json)
}

async fn api_auth(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let body = parse_body(&body)?;
    let request: LoginRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
    let app = state
        .app
        .lock()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let response = app.auth.login(&request)?;
    Ok(Json(json!(response)))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "reelshelf"
    }))
}

fn cors_layer(allow_origin: &str) -> CorsLayer {
    let origin = if allow_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allow_origin
            .split(',')
            .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
            .collect();
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Builds the full router for `state`.
pub fn build_router(state: AppState) -> Router {
    let allow_origin = match state.app.lock() {
        Ok(app) => app.settings.cors_allow_origin.clone(),
        Err(_) => "*".to_string(),
    };

    Router::new()
        .route(
            "/api/videos",
            post(api_videos)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/auth",
            post(api_auth).options(preflight).fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_10MB))
        .layer(cors_layer(&allow_origin))
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting web server on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}
