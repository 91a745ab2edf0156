mod common;

use std::fs;
use std::io::Write;

use common::{build_app, build_app_from, load_test_config, login_json, user_json};
use lich_client::config::{FileStorageConfig, StorageConfig};
use lich_client::models::{
    LoginRequest, RegisterRequest, TokenKind, UpdateUserRequest, UserResponse,
};
use lich_client::session::Guarded;
use lich_client::{ClientError, SessionState};
use mockito::{Matcher, Server, ServerGuard};
use reqwest::StatusCode;
use serde_json::json;

fn credentials() -> LoginRequest {
    LoginRequest::new("a@b.com", "secret123")
}

async fn mock_login(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/api/v1/auth/login")
        .match_body(Matcher::Json(json!({"email": "a@b.com", "password": "secret123"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(login_json("a@b.com", "AT1", "RT1"))
        .create_async()
        .await
}

#[tokio::test]
async fn integration_login_stores_tokens_and_authenticates() {
    let mut server = Server::new_async().await;
    let m = mock_login(&mut server).await;
    let app = build_app(&server.url(), "jwt_builtin");

    assert_eq!(app.session.init().await, SessionState::Anonymous);
    let user = app.session.login(&credentials()).await.expect("login should succeed");
    m.assert_async().await;

    let storage = app.client.storage();
    assert_eq!(storage.get(TokenKind::Access).as_deref(), Some("AT1"));
    assert_eq!(storage.get(TokenKind::Refresh).as_deref(), Some("RT1"));
    assert!(app.session.is_authenticated());
    assert_eq!(app.session.user(), Some(user.clone()));
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.id.to_string(), common::USER_ID);
}

#[tokio::test]
async fn integration_failed_login_leaves_state_unchanged() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/auth/login")
        .with_status(401)
        .with_body(r#"{"error":{"code":"INVALID_CREDENTIALS","message":"Invalid email or password"}}"#)
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");
    app.session.init().await;

    let err = app.session.login(&credentials()).await.unwrap_err();
    m.assert_async().await;

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.api_error().unwrap().code, "INVALID_CREDENTIALS");
    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.client.storage().get(TokenKind::Access).is_none());
}

#[tokio::test]
async fn integration_logout_succeeds_remotely() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let logout = server
        .mock("POST", "/api/v1/auth/logout")
        .match_header("authorization", "Bearer AT1")
        .with_status(204)
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    app.session.login(&credentials()).await.unwrap();
    app.session.logout().await;
    logout.assert_async().await;

    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.client.storage().get(TokenKind::Access).is_none());
    assert!(app.client.storage().get(TokenKind::Refresh).is_none());
}

/// A broken logout endpoint must not trap the user in their session.
#[tokio::test]
async fn integration_logout_signs_out_locally_when_remote_fails() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let logout = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    app.session.login(&credentials()).await.unwrap();
    app.session.logout().await;
    logout.assert_async().await;

    assert!(!app.session.is_authenticated());
    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.client.storage().get(TokenKind::Access).is_none());
    assert!(app.client.storage().get(TokenKind::Refresh).is_none());
}

#[tokio::test]
async fn integration_register_never_authenticates() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/auth/register")
        .match_header("authorization", Matcher::Missing)
        .with_status(201)
        .with_body(user_json("new@b.com").to_string())
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");
    app.session.init().await;

    let data = RegisterRequest {
        email: "new@b.com".to_string(),
        password: "Secret123".to_string(),
        username: Some("newbie".to_string()),
        ..Default::default()
    };
    let user = app.session.register(&data).await.expect("register should succeed");
    m.assert_async().await;

    assert_eq!(user.email, "new@b.com");
    assert!(!app.session.is_authenticated());
    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.client.storage().get(TokenKind::Access).is_none());
    assert!(app.client.storage().get(TokenKind::Refresh).is_none());
}

/// Without a stored token the store settles without any authenticated call.
#[tokio::test]
async fn integration_init_without_token_makes_no_call() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", Matcher::Regex(r"^/api/v1/(users|auth)/me$".to_string()))
        .expect(0)
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    assert!(app.session.is_loading());
    assert_eq!(app.session.init().await, SessionState::Anonymous);
    assert!(!app.session.is_loading());
    me.assert_async().await;
}

#[tokio::test]
async fn integration_init_restores_session_from_token() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", "/api/v1/users/me")
        .match_header("authorization", "Bearer AT9")
        .with_status(200)
        .with_body(user_json("a@b.com").to_string())
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");
    app.client.storage().set(TokenKind::Access, "AT9").unwrap();

    let state = app.session.init().await;
    me.assert_async().await;
    assert!(state.is_authenticated());
    assert_eq!(app.session.user().unwrap().display_name(), "Ada Lovelace");
}

#[tokio::test]
async fn integration_refresh_user_failure_goes_anonymous() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let me = server
        .mock("GET", "/api/v1/users/me")
        .with_status(401)
        .with_body(r#"{"error":{"code":"UNAUTHORIZED","message":"Invalid token"}}"#)
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    app.session.login(&credentials()).await.unwrap();
    assert!(app.session.is_authenticated());

    app.session.refresh_user().await;
    me.assert_async().await;
    assert!(app.session.user().is_none());
    assert_eq!(app.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn integration_refresh_user_replaces_held_user() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let mut updated = user_json("a@b.com");
    updated["full_name"] = json!("Countess Lovelace");
    let me = server
        .mock("GET", "/api/v1/users/me")
        .with_status(200)
        .with_body(updated.to_string())
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    app.session.login(&credentials()).await.unwrap();
    app.session.refresh_user().await;
    me.assert_async().await;
    assert_eq!(app.session.user().unwrap().full_name, "Countess Lovelace");
}

#[tokio::test]
async fn integration_failed_token_refresh_ends_session() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let refresh = server
        .mock("POST", "/api/v1/auth/refresh")
        .match_body(Matcher::Json(json!({"refresh_token": "RT1"})))
        .with_status(401)
        .with_body(r#"{"error":{"code":"UNAUTHORIZED","message":"Invalid token"}}"#)
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    app.session.login(&credentials()).await.unwrap();
    let err = app.session.refresh_tokens().await.unwrap_err();
    refresh.assert_async().await;

    assert!(err.is_unauthorized());
    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.client.storage().get(TokenKind::Access).is_none());
    assert!(app.client.storage().get(TokenKind::Refresh).is_none());
}

#[tokio::test]
async fn integration_update_profile_syncs_held_user() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let mut updated = user_json("a@b.com");
    updated["first_name"] = json!("Augusta");
    let patch = server
        .mock("PATCH", "/api/v1/users/me")
        .match_header("authorization", "Bearer AT1")
        .match_body(Matcher::Json(json!({"first_name": "Augusta"})))
        .with_status(200)
        .with_body(updated.to_string())
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");

    app.session.login(&credentials()).await.unwrap();
    let data = UpdateUserRequest {
        first_name: Some("Augusta".to_string()),
        ..Default::default()
    };
    app.session.update_profile(&data).await.unwrap();
    patch.assert_async().await;
    assert_eq!(app.session.user().unwrap().first_name, "Augusta");
}

#[tokio::test]
async fn integration_route_guard_follows_session() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let _logout = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(204)
        .create_async()
        .await;
    let mut config = load_test_config(&server.url(), "jwt_builtin");
    config.auth.login_path = "/signin".to_string();
    let app = build_app_from(config);
    let dashboard = app.with_auth(|user: &UserResponse| format!("Dashboard for {}", user.email));

    assert_eq!(dashboard.render(&app.session), Guarded::Loading);
    app.session.init().await;
    assert_eq!(
        dashboard.render(&app.session),
        Guarded::Redirect("/signin".to_string())
    );

    app.session.login(&credentials()).await.unwrap();
    assert_eq!(
        dashboard.render(&app.session),
        Guarded::Render("Dashboard for a@b.com".to_string())
    );

    app.session.logout().await;
    assert_eq!(
        dashboard.render(&app.session),
        Guarded::Redirect("/signin".to_string())
    );
}

#[tokio::test]
async fn integration_keycloak_token_sign_in() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", "/api/v1/users/me")
        .match_header("authorization", "Bearer KC1")
        .with_status(200)
        .with_body(user_json("a@b.com").to_string())
        .create_async()
        .await;
    let app = build_app(&server.url(), "keycloak");
    app.session.init().await;

    assert!(matches!(
        app.session.login(&credentials()).await,
        Err(ClientError::Unsupported { .. })
    ));

    let user = app.session.sign_in_with_token("KC1", None).await.unwrap();
    me.assert_async().await;
    assert_eq!(user.email, "a@b.com");
    assert!(app.session.is_authenticated());
}

#[tokio::test]
async fn integration_rejected_token_sign_in_is_discarded() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", "/api/v1/users/me")
        .with_status(401)
        .create_async()
        .await;
    let app = build_app(&server.url(), "keycloak");

    let err = app.session.sign_in_with_token("BAD", Some("RT")).await.unwrap_err();
    me.assert_async().await;
    assert_eq!(err.api_error().unwrap().code, "UNKNOWN");
    assert!(app.client.storage().get(TokenKind::Access).is_none());
    assert_eq!(app.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn integration_login_recovers_from_damaged_token_file() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_body(login_json("a@b.com", "AT1", "RT1"))
        .expect(2)
        .create_async()
        .await;
    let _logout = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(204)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    fs::write(&path, r#"{"access_tok"#).unwrap();
    let mut config = load_test_config(&server.url(), "jwt_builtin");
    config.storage = StorageConfig::File(FileStorageConfig { path: path.clone() });
    let app = build_app_from(config);

    assert_eq!(app.session.init().await, SessionState::Anonymous);
    app.session.login(&credentials()).await.expect("first login");
    assert_eq!(app.client.storage().get(TokenKind::Access).as_deref(), Some("AT1"));

    app.session.logout().await;
    assert!(!path.exists());

    fs::write(&path, "garbage").unwrap();
    app.session.login(&credentials()).await.expect("second login");
    login.assert_async().await;
    assert!(app.session.is_authenticated());
    assert_eq!(app.client.storage().get(TokenKind::Refresh).as_deref(), Some("RT1"));
}

/// A request already on its way keeps the bearer token it was built with,
/// even if the session logs out before the response arrives.
#[tokio::test]
async fn integration_in_flight_request_keeps_token_snapshot() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let me = server
        .mock("GET", "/api/v1/users/me")
        .match_header("authorization", "Bearer AT1")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_millis(200));
            w.write_all(user_json("a@b.com").to_string().as_bytes())
        })
        .create_async()
        .await;
    let logout = server
        .mock("POST", "/api/v1/auth/logout")
        .match_header("authorization", "Bearer AT1")
        .with_status(204)
        .create_async()
        .await;
    let app = build_app(&server.url(), "jwt_builtin");
    app.session.login(&credentials()).await.unwrap();

    let client = app.client.clone();
    let in_flight = tokio::spawn(async move { client.users().get_me().await });
    // Let the spawned request build its headers and hit the wire.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    app.session.logout().await;
    assert!(app.client.storage().get(TokenKind::Access).is_none());

    let user = in_flight.await.unwrap().expect("in-flight request should succeed");
    assert_eq!(user.email, "a@b.com");
    me.assert_async().await;
    logout.assert_async().await;
    assert_eq!(app.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn integration_keycloak_logout_redirect() {
    let mut server = Server::new_async().await;
    let config = server
        .mock("GET", "/api/v1/auth/config")
        .with_status(200)
        .with_body(r#"{"keycloak_url":"https://id.example.com/","realm":"lich","client_id":"web"}"#)
        .create_async()
        .await;
    let _logout = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(204)
        .create_async()
        .await;
    let app = build_app(&server.url(), "keycloak");

    app.session.logout().await;
    let url = app
        .session
        .logout_redirect_url("http://localhost:3000/")
        .await
        .unwrap();
    config.assert_async().await;
    assert_eq!(
        url.as_str(),
        "https://id.example.com/realms/lich/protocol/openid-connect/logout?client_id=web&post_logout_redirect_uri=http%3A%2F%2Flocalhost%3A3000%2F"
    );

    let jwt = build_app(&server.url(), "jwt_builtin");
    assert!(matches!(
        jwt.session.logout_redirect_url("http://localhost:3000/").await,
        Err(ClientError::Unsupported { operation: "logout_redirect_url", .. })
    ));
}
