// ReelShelf Settings Engine
// Loads server settings from an optional JSON file, then applies environment overrides.

use std::fs;
use std::path::Path;

use crate::types::errors::SettingsError;
use crate::types::settings::{AuthCredentials, ServerSettings};

/// Path of the optional JSON settings file.
pub const CONFIG_PATH_VAR: &str = "REELSHELF_CONFIG";
pub const BIND_VAR: &str = "REELSHELF_BIND";
pub const DATABASE_PATH_VAR: &str = "REELSHELF_DATABASE_PATH";
pub const TITLE_TIMEOUT_VAR: &str = "REELSHELF_TITLE_TIMEOUT_SECS";
pub const AUTH_USERNAME_VAR: &str = "AUTH_USERNAME";
pub const AUTH_PASSWORD_VAR: &str = "AUTH_PASSWORD";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ServerSettings, SettingsError>;
    fn get_settings(&self) -> &ServerSettings;
    fn get_config_path(&self) -> Option<&str>;
}

/// Settings engine reading a JSON file and the process environment.
pub struct SettingsEngine {
    config_path: Option<String>,
    settings: ServerSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine. Without a path only defaults and the
    /// environment are used.
    pub fn new(config_path: Option<String>) -> Self {
        Self {
            config_path,
            settings: ServerSettings::default(),
        }
    }

    /// Creates an engine whose file path comes from `REELSHELF_CONFIG`.
    pub fn from_env() -> Self {
        Self::new(std::env::var(CONFIG_PATH_VAR).ok())
    }

    fn read_file(path: &Path) -> Result<ServerSettings, SettingsError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })
    }
}

/// Applies environment overrides to `settings`. `lookup` returns the value
/// of a variable; empty values count as unset.
pub fn apply_overrides<F>(settings: &mut ServerSettings, lookup: F) -> Result<(), SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get(BIND_VAR) {
        settings.bind_address = bind;
    }
    if let Some(path) = get(DATABASE_PATH_VAR) {
        settings.database_path = Some(path);
    }
    if let Some(raw) = get(TITLE_TIMEOUT_VAR) {
        let secs: u64 = raw.trim().parse().map_err(|_| {
            SettingsError::InvalidValue(format!("{} must be a whole number of seconds", TITLE_TIMEOUT_VAR))
        })?;
        if secs == 0 {
            return Err(SettingsError::InvalidValue(format!(
                "{} must be greater than zero",
                TITLE_TIMEOUT_VAR
            )));
        }
        settings.title_fetch_timeout_secs = secs;
    }

    let username = get(AUTH_USERNAME_VAR);
    let password = get(AUTH_PASSWORD_VAR);
    if username.is_some() || password.is_some() {
        let current = settings.auth.take();
        let username = username.or_else(|| current.as_ref().map(|c| c.username.clone()));
        let password = password.or_else(|| current.as_ref().map(|c| c.password.clone()));
        settings.auth = match (username, password) {
            (Some(username), Some(password)) => Some(AuthCredentials { username, password }),
            _ => None,
        };
    }

    Ok(())
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads the settings file (if any) and applies environment overrides.
    ///
    /// A configured but missing file is an error; no path means defaults.
    fn load(&mut self) -> Result<ServerSettings, SettingsError> {
        let mut settings = match &self.config_path {
            Some(path) => Self::read_file(Path::new(path))?,
            None => ServerSettings::default(),
        };
        apply_overrides(&mut settings, |name| std::env::var(name).ok())?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn get_settings(&self) -> &ServerSettings {
        &self.settings
    }

    fn get_config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }
}
