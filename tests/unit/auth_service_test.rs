//! Unit tests for the shared-login auth service.

use reelshelf::services::auth_service::{AuthService, AuthServiceTrait};
use reelshelf::types::auth::LoginRequest;
use reelshelf::types::errors::AuthError;
use reelshelf::types::settings::AuthCredentials;

fn service() -> AuthService {
    AuthService::new(Some(AuthCredentials {
        username: "admin".to_string(),
        password: "correct horse".to_string(),
    }))
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn valid_credentials_issue_a_token() {
    let auth = service();
    let response = auth.login(&login("admin", "correct horse")).unwrap();
    assert!(response.success);
    assert_eq!(response.username, "admin");
    assert!(uuid::Uuid::parse_str(&response.token).is_ok());
}

#[test]
fn each_login_gets_a_fresh_token() {
    let auth = service();
    let a = auth.login(&login("admin", "correct horse")).unwrap();
    let b = auth.login(&login("admin", "correct horse")).unwrap();
    assert_ne!(a.token, b.token);
}

#[test]
fn logins_share_one_immutable_service() {
    let auth = std::sync::Arc::new(service());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let auth = std::sync::Arc::clone(&auth);
            std::thread::spawn(move || {
                (0..250)
                    .map(|_| auth.login(&login("admin", "correct horse")).unwrap().token)
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let tokens: std::collections::HashSet<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(tokens.len(), 1000);
}

#[test]
fn wrong_credentials_are_rejected() {
    let auth = service();
    assert!(matches!(
        auth.login(&login("admin", "wrong")),
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login(&login("Admin", "correct horse")),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn missing_configuration_is_reported() {
    let auth = AuthService::new(None);
    assert!(!auth.is_configured());
    assert!(matches!(
        auth.login(&login("admin", "x")),
        Err(AuthError::NotConfigured)
    ));

    let blank = AuthService::new(Some(AuthCredentials {
        username: "admin".to_string(),
        password: String::new(),
    }));
    assert!(!blank.is_configured());
    assert!(matches!(blank.login(&login("admin", "")), Err(AuthError::NotConfigured)));
}

#[test]
fn login_request_debug_hides_password() {
    let shown = format!("{:?}", login("admin", "topsecret"));
    assert!(!shown.contains("topsecret"));
}
