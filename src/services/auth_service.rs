//! Auth Service for ReelShelf.
//!
//! One shared login configured on the server. A successful login returns a
//! random session token. Tokens are not stored; nothing checks them later.

use ring::digest::{digest, SHA256};
use uuid::Uuid;

use crate::types::auth::{LoginRequest, LoginResponse};
use crate::types::errors::AuthError;
use crate::types::settings::AuthCredentials;

/// Trait defining authentication operations.
pub trait AuthServiceTrait {
    fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError>;
    fn is_configured(&self) -> bool;
}

pub struct AuthService {
    credentials: Option<AuthCredentials>,
}

impl AuthService {
    pub fn new(credentials: Option<AuthCredentials>) -> Self {
        let credentials = credentials.filter(|c| !c.username.is_empty() && !c.password.is_empty());
        Self { credentials }
    }
}

// Compares fixed-size digests so the comparison time does not depend on
// where the inputs first differ.
fn digests_match(a: &str, b: &str) -> bool {
    digest(&SHA256, a.as_bytes()).as_ref() == digest(&SHA256, b.as_bytes()).as_ref()
}

impl AuthServiceTrait for AuthService {
    fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let credentials = match &self.credentials {
            Some(c) => c,
            None => {
                tracing::warn!("login attempted but authentication is not configured");
                return Err(AuthError::NotConfigured);
            }
        };

        tracing::info!(username = %request.username, "auth attempt");

        let user_ok = digests_match(&request.username, &credentials.username);
        let pass_ok = digests_match(&request.password, &credentials.password);
        if !(user_ok && pass_ok) {
            tracing::info!("auth failed");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(LoginResponse {
            success: true,
            token: Uuid::new_v4().to_string(),
            username: credentials.username.clone(),
        })
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}
