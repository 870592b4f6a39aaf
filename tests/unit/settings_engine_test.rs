//! Unit tests for the ReelShelf settings engine.

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use reelshelf::services::settings_engine::{
    apply_overrides, SettingsEngine, SettingsEngineTrait, AUTH_PASSWORD_VAR, AUTH_USERNAME_VAR,
    BIND_VAR, DATABASE_PATH_VAR, TITLE_TIMEOUT_VAR,
};
use reelshelf::types::errors::SettingsError;
use reelshelf::types::settings::{AuthCredentials, ServerSettings};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_defaults() {
    let settings = ServerSettings::default();
    assert_eq!(settings.bind_address, "127.0.0.1:8787");
    assert_eq!(settings.title_fetch_timeout_secs, 5);
    assert_eq!(settings.cors_allow_origin, "*");
    assert!(settings.database_path.is_none());
    assert!(settings.auth.is_none());
}

#[test]
fn test_overrides_apply_in_place() {
    let mut settings = ServerSettings::default();
    apply_overrides(
        &mut settings,
        env(&[
            (BIND_VAR, "0.0.0.0:9000"),
            (DATABASE_PATH_VAR, "/var/lib/reelshelf.db"),
            (TITLE_TIMEOUT_VAR, "12"),
            (AUTH_USERNAME_VAR, "admin"),
            (AUTH_PASSWORD_VAR, "hunter2"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.bind_address, "0.0.0.0:9000");
    assert_eq!(settings.database_path.as_deref(), Some("/var/lib/reelshelf.db"));
    assert_eq!(settings.title_fetch_timeout_secs, 12);
    let auth = settings.auth.as_ref().unwrap();
    assert_eq!(auth.username, "admin");
    assert_eq!(auth.password, "hunter2");
}

#[test]
fn test_empty_values_are_ignored() {
    let mut settings = ServerSettings::default();
    apply_overrides(&mut settings, env(&[(DATABASE_PATH_VAR, "  ")])).unwrap();
    assert!(settings.database_path.is_none());
}

#[test]
fn test_half_configured_auth_stays_unconfigured() {
    let mut settings = ServerSettings::default();
    apply_overrides(&mut settings, env(&[(AUTH_USERNAME_VAR, "admin")])).unwrap();
    assert!(settings.auth.is_none());
}

#[test]
fn test_env_password_combines_with_file_username() {
    let mut settings = ServerSettings {
        auth: Some(AuthCredentials {
            username: "owner".to_string(),
            password: "old".to_string(),
        }),
        ..ServerSettings::default()
    };
    apply_overrides(&mut settings, env(&[(AUTH_PASSWORD_VAR, "new")])).unwrap();
    let auth = settings.auth.as_ref().unwrap();
    assert_eq!(auth.username, "owner");
    assert_eq!(auth.password, "new");
}

#[test]
fn test_invalid_timeout_is_rejected() {
    let mut settings = ServerSettings::default();
    let err = apply_overrides(&mut settings, env(&[(TITLE_TIMEOUT_VAR, "soon")])).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));

    let err = apply_overrides(&mut settings, env(&[(TITLE_TIMEOUT_VAR, "0")])).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
}

#[test]
fn test_load_without_file_uses_defaults() {
    let mut engine = SettingsEngine::new(None);
    let settings = engine.load().unwrap();
    assert_eq!(settings.title_fetch_timeout_secs, 5);
    assert!(engine.get_config_path().is_none());
}

#[test]
fn test_load_reads_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reelshelf.json");
    fs::write(&path, r#"{"title_fetch_timeout_secs": 9, "cors_allow_origin": "https://a.example"}"#)
        .unwrap();

    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    let settings = engine.load().unwrap();
    assert_eq!(settings.title_fetch_timeout_secs, 9);
    assert_eq!(settings.cors_allow_origin, "https://a.example");
    assert_eq!(engine.get_settings(), &settings);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    assert!(matches!(engine.load(), Err(SettingsError::IoError(_))));
}

#[test]
fn test_load_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_load_leaves_config_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reelshelf.json");
    let original = r#"{"auth": {"username": "admin", "password": "secret"}}"#;
    fs::write(&path, original).unwrap();

    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    let settings = engine.load().unwrap();
    assert!(settings.auth.is_some());
    drop(engine);

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_credentials_debug_redacts_password() {
    let creds = AuthCredentials {
        username: "admin".to_string(),
        password: "s3cret".to_string(),
    };
    let shown = format!("{:?}", creds);
    assert!(shown.contains("admin"));
    assert!(!shown.contains("s3cret"));
}
