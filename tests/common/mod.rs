#![allow(dead_code)]

use async_trait::async_trait;
use axum::routing::get;
use axum::{Router, middleware};
use axum_test::TestServer;
use chrono::NaiveDate;
use contacts_api::api::handlers::health_handler;
use contacts_api::api::middleware::auth;
use contacts_api::api::routes::{protected_routes, public_routes};
use contacts_api::config::Config;
use contacts_api::infrastructure::cache::{CacheResult, CacheService, NullCache};
use contacts_api::infrastructure::mailer::LogMailer;
use contacts_api::security::{PasswordHasher, TokenProvider, TokenType};
use contacts_api::state::AppState;
use jsonwebtoken::Algorithm;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        public_base_url: "http://localhost:8000".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        cache_ttl_seconds: 60,
        contact_create_per_minute: 5,
        secret_key: "test-secret-key-for-testing-only".to_string(),
        jwt_algorithm: Algorithm::HS256,
        access_token_expire_minutes: 15,
        refresh_token_expire_days: 7,
        email_token_expire_hours: 24,
        require_email_verification: true,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
        db_connect_retries: 1,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    create_test_state_with(pool, &test_config())
}

pub fn create_test_state_with(pool: PgPool, config: &Config) -> AppState {
    AppState::new(pool, Arc::new(NullCache), Arc::new(LogMailer), config).unwrap()
}

pub fn create_test_state_with_cache(pool: PgPool, cache: Arc<dyn CacheService>) -> AppState {
    AppState::new(pool, cache, Arc::new(LogMailer), &test_config()).unwrap()
}

/// In-process cache that keeps entries until they are invalidated.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// All routes with authentication but without per-IP rate limiting, which
/// needs a peer address the in-process transport does not provide.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(public_routes())
        .merge(
            protected_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        )
        .with_state(state)
}

pub fn make_server(pool: PgPool) -> TestServer {
    TestServer::new(test_router(create_test_state(pool))).unwrap()
}

pub fn token_provider() -> TokenProvider {
    TokenProvider::from_config(&test_config())
}

pub fn access_token(email: &str) -> String {
    token_provider().issue(email, TokenType::Access).unwrap()
}

pub async fn create_user(pool: &PgPool, email: &str, verified: bool) -> i64 {
    let hash = PasswordHasher::new().hash(TEST_PASSWORD).unwrap();

    sqlx::query_scalar(
        "INSERT INTO users (email, hashed_password, is_verified) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(email)
    .bind(hash)
    .bind(verified)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_contact(
    pool: &PgPool,
    user_id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
    birthday: NaiveDate,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO contacts (user_id, first_name, last_name, email, phone_number, birthday)
        VALUES ($1, $2, $3, $4, '+380501234567', $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(birthday)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
