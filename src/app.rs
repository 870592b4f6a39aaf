//! App Core for ReelShelf.
//!
//! Holds the database, the loaded settings and the auth service. The HTTP
//! server and the stdio RPC binary share one `App` behind a mutex.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::database::Database;
use crate::services::auth_service::AuthService;
use crate::services::settings_engine::DATABASE_PATH_VAR;
use crate::services::title_fetcher::TitleFetcher;
use crate::types::errors::{ApiError, TitleFetchError};
use crate::types::settings::ServerSettings;

/// Central application struct.
///
/// Managers are created on demand from `database()?.connection()` because
/// they borrow the connection with a lifetime.
pub struct App {
    db: Option<Database>,
    pub settings: ServerSettings,
    pub auth: AuthService,
}

impl App {
    /// Creates the app and opens the configured database, running migrations.
    /// Without a database path the app still starts; data actions then fail.
    pub fn new(settings: ServerSettings) -> Result<Self, rusqlite::Error> {
        let db = match settings.database_path.as_deref() {
            Some(path) => {
                let db = Database::open(path)?;
                tracing::info!(path, schema_version = db.schema_version(), "database ready");
                Some(db)
            }
            None => {
                tracing::warn!("{} not configured; data actions will fail", DATABASE_PATH_VAR);
                None
            }
        };
        Ok(Self::from_parts(db, settings))
    }

    /// Creates the app around an already opened database.
    pub fn with_database(db: Database, settings: ServerSettings) -> Self {
        Self::from_parts(Some(db), settings)
    }

    fn from_parts(db: Option<Database>, settings: ServerSettings) -> Self {
        let auth = AuthService::new(settings.auth.clone());
        Self { db, settings, auth }
    }

    /// The database, or the "not configured" error every data action reports.
    pub fn database(&self) -> Result<&Database, ApiError> {
        self.db
            .as_ref()
            .ok_or_else(|| ApiError::NotConfigured(DATABASE_PATH_VAR.to_string()))
    }
}

/// State shared by the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Mutex<App>>,
    pub title_fetcher: Arc<TitleFetcher>,
}

impl AppState {
    pub fn new(app: App) -> Result<Self, TitleFetchError> {
        let timeout = Duration::from_secs(app.settings.title_fetch_timeout_secs);
        Ok(Self {
            title_fetcher: Arc::new(TitleFetcher::new(timeout)?),
            app: Arc::new(Mutex::new(app)),
        })
    }
}
