use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default listen address of the HTTP server.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";

/// Default timeout for the remote page title fetch.
pub const DEFAULT_TITLE_FETCH_TIMEOUT_SECS: u64 = 5;

/// Server configuration, read from an optional JSON file and the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    pub database_path: Option<String>,
    pub auth: Option<AuthCredentials>,
    pub title_fetch_timeout_secs: u64,
    pub cors_allow_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_path: None,
            auth: None,
            title_fetch_timeout_secs: DEFAULT_TITLE_FETCH_TIMEOUT_SECS,
            cors_allow_origin: "*".to_string(),
        }
    }
}

/// The single shared login. The password is wiped from memory on drop.
#[derive(Clone, PartialEq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct AuthCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
