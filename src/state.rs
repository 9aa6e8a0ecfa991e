//! Shared application state injected into handlers.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

use crate::api::middleware::UserRateLimiter;
use crate::application::services::{AuthService, ContactService, UserService};
use crate::config::Config;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::mailer::Mailer;
use crate::infrastructure::persistence::{PgContactRepository, PgUserRepository};
use crate::security::{PasswordHasher, TokenProvider};

/// Services and shared resources, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub auth_service: Arc<AuthService<PgUserRepository>>,
    pub user_service: Arc<UserService<PgUserRepository>>,
    pub contact_service: Arc<ContactService<PgContactRepository>>,
    pub contact_limiter: Arc<UserRateLimiter>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires repositories and services on top of a connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if `PUBLIC_BASE_URL` cannot be parsed.
    pub fn new(
        pool: PgPool,
        cache: Arc<dyn CacheService>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Result<Self> {
        let pool = Arc::new(pool);
        let tokens = Arc::new(TokenProvider::from_config(config));
        let hasher = PasswordHasher::new();

        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let contact_repository = Arc::new(PgContactRepository::new(pool.clone()));

        let auth_service = AuthService::new(
            user_repository.clone(),
            cache.clone(),
            tokens.clone(),
            hasher.clone(),
            config.require_email_verification,
        );
        let user_service = UserService::new(
            user_repository,
            cache.clone(),
            tokens,
            hasher,
            mailer,
            config.base_url()?,
        );
        let contact_service = ContactService::new(contact_repository, cache.clone());

        Ok(Self {
            db: pool,
            auth_service: Arc::new(auth_service),
            user_service: Arc::new(user_service),
            contact_service: Arc::new(contact_service),
            contact_limiter: Arc::new(UserRateLimiter::per_minute(
                config.contact_create_per_minute,
            )),
            cache,
        })
    }
}
