mod common;

use axum::http::StatusCode;
use contacts_api::security::TokenType;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn login(server: &axum_test::TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/login")
        .form(&[("username", email), ("password", password)])
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

// ─── REGISTER ────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_register_success(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server
        .post("/register")
        .json(&json!({ "email": "New.User@Example.com", "password": "secret123" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["email"], "new.user@example.com");
    assert_eq!(body["is_verified"], false);
    assert!(body["id"].is_i64());
    assert!(body.get("hashed_password").is_none());
    assert!(body.get("refresh_token_hash").is_none());
}

#[sqlx::test]
async fn test_register_duplicate_email(pool: PgPool) {
    common::create_user(&pool, "taken@example.com", true).await;
    let server = common::make_server(pool);

    let response = server
        .post("/register")
        .json(&json!({ "email": "TAKEN@example.com", "password": "secret123" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "Email already registered");
}

#[sqlx::test]
async fn test_register_short_password(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server
        .post("/register")
        .json(&json!({ "email": "user@example.com", "password": "123" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["password"].is_array());
}

// ─── LOGIN ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_login_success(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let server = common::make_server(pool);

    let tokens = login(&server, "User@Example.com", common::TEST_PASSWORD).await;

    assert_eq!(tokens["token_type"], "bearer");
    let access = tokens["access_token"].as_str().unwrap();
    assert!(tokens["refresh_token"].is_string());

    let me = server.get("/users/me").authorization_bearer(access).await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["email"], "user@example.com");
}

#[sqlx::test]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let server = common::make_server(pool);

    let response = server
        .post("/login")
        .form(&[("username", "user@example.com"), ("password", "wrong-password")])
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[sqlx::test]
async fn test_login_unknown_user(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server
        .post("/login")
        .form(&[("username", "ghost@example.com"), ("password", "secret123")])
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_login_inactive_user(pool: PgPool) {
    common::create_user(&pool, "gone@example.com", true).await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE email = 'gone@example.com'")
        .execute(&pool)
        .await
        .unwrap();
    let server = common::make_server(pool);

    let response = server
        .post("/login")
        .form(&[("username", "gone@example.com"), ("password", common::TEST_PASSWORD)])
        .await;

    response.assert_status_unauthorized();
}

// ─── REFRESH / LOGOUT ────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_refresh_rotates_and_rejects_reuse(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let server = common::make_server(pool);

    let first = login(&server, "user@example.com", common::TEST_PASSWORD).await;
    let old_refresh = first["refresh_token"].as_str().unwrap().to_string();

    let response = server
        .post("/refresh")
        .json(&json!({ "refresh_token": old_refresh }))
        .await;
    response.assert_status_ok();
    let second = response.json::<Value>();
    assert_ne!(second["refresh_token"], first["refresh_token"]);

    // The rotated-out token no longer works.
    server
        .post("/refresh")
        .json(&json!({ "refresh_token": old_refresh }))
        .await
        .assert_status_unauthorized();

    // The new one does.
    server
        .post("/refresh")
        .json(&json!({ "refresh_token": second["refresh_token"] }))
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_concurrent_refresh_with_same_token_has_one_winner(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let state = common::create_test_state(pool);

    let pair = state
        .auth_service
        .login("user@example.com", common::TEST_PASSWORD)
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        state.auth_service.refresh(&pair.refresh_token),
        state.auth_service.refresh(&pair.refresh_token),
    );

    assert_eq!(
        [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count(),
        1
    );
}

#[sqlx::test]
async fn test_refresh_with_access_token_is_rejected(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let server = common::make_server(pool);

    let tokens = login(&server, "user@example.com", common::TEST_PASSWORD).await;

    server
        .post("/refresh")
        .json(&json!({ "refresh_token": tokens["access_token"] }))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_logout_revokes_refresh_token(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let server = common::make_server(pool);

    let tokens = login(&server, "user@example.com", common::TEST_PASSWORD).await;

    server
        .post("/logout")
        .authorization_bearer(tokens["access_token"].as_str().unwrap())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post("/refresh")
        .json(&json!({ "refresh_token": tokens["refresh_token"] }))
        .await
        .assert_status_unauthorized();
}

// ─── E-MAIL VERIFICATION ─────────────────────────────────────────────────────

#[sqlx::test]
async fn test_verify_email(pool: PgPool) {
    common::create_user(&pool, "new@example.com", false).await;
    let server = common::make_server(pool.clone());

    let token = common::token_provider()
        .issue("new@example.com", TokenType::EmailVerification)
        .unwrap();

    let response = server
        .get("/verify-email")
        .add_query_param("token", &token)
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["message"].is_string());

    let verified: bool =
        sqlx::query_scalar("SELECT is_verified FROM users WHERE email = 'new@example.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(verified);

    // Following the link again is harmless.
    server
        .get("/verify-email")
        .add_query_param("token", &token)
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_verify_email_rejects_other_token_types(pool: PgPool) {
    common::create_user(&pool, "new@example.com", false).await;
    let server = common::make_server(pool);

    server
        .get("/verify-email")
        .add_query_param("token", common::access_token("new@example.com"))
        .await
        .assert_status_unauthorized();

    server
        .get("/verify-email")
        .add_query_param("token", "garbage")
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_resend_verification_does_not_reveal_accounts(pool: PgPool) {
    common::create_user(&pool, "pending@example.com", false).await;
    let server = common::make_server(pool);

    let known = server
        .post("/verify-email/resend")
        .json(&json!({ "email": "pending@example.com" }))
        .await;
    let unknown = server
        .post("/verify-email/resend")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;

    known.assert_status(StatusCode::ACCEPTED);
    unknown.assert_status(StatusCode::ACCEPTED);
    assert_eq!(known.json::<Value>(), unknown.json::<Value>());
}

// ─── CURRENT USER ────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_me_requires_token(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/users/me").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[sqlx::test]
async fn test_me_rejects_invalid_token(pool: PgPool) {
    let server = common::make_server(pool);

    server
        .get("/users/me")
        .authorization_bearer("not-a-jwt")
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_me_unknown_user(pool: PgPool) {
    let server = common::make_server(pool);

    server
        .get("/users/me")
        .authorization_bearer(common::access_token("ghost@example.com"))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_me_unverified_user_is_forbidden(pool: PgPool) {
    common::create_user(&pool, "pending@example.com", false).await;
    let server = common::make_server(pool);

    let response = server
        .get("/users/me")
        .authorization_bearer(common::access_token("pending@example.com"))
        .await;

    response.assert_status_forbidden();
    assert_eq!(response.json::<Value>()["error"]["message"], "Email not verified");
}

#[sqlx::test]
async fn test_me_unverified_user_allowed_when_not_required(pool: PgPool) {
    common::create_user(&pool, "pending@example.com", false).await;

    let mut config = common::test_config();
    config.require_email_verification = false;
    let state = common::create_test_state_with(pool, &config);
    let server = axum_test::TestServer::new(common::test_router(state)).unwrap();

    server
        .get("/users/me")
        .authorization_bearer(common::access_token("pending@example.com"))
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_update_avatar(pool: PgPool) {
    common::create_user(&pool, "user@example.com", true).await;
    let server = common::make_server(pool);
    let token = common::access_token("user@example.com");

    let response = server
        .patch("/users/me/avatar")
        .authorization_bearer(&token)
        .json(&json!({ "avatar_url": "https://cdn.example.com/avatars/1.png" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["avatar_url"],
        "https://cdn.example.com/avatars/1.png"
    );

    server
        .patch("/users/me/avatar")
        .authorization_bearer(&token)
        .json(&json!({ "avatar_url": "not a url" }))
        .await
        .assert_status_bad_request();
}
