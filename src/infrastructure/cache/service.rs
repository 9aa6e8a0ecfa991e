//! Cache service trait, error types and JSON helpers.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching serialized values by key.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures degrade to database lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a raw value.
    ///
    /// Returns `Ok(None)` on cache miss or backend error (fail-open behavior).
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a raw value with optional TTL in seconds
    /// (implementation-specific default if `None`).
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached value. Used when the underlying record changes.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

/// Cache key for a user looked up by e-mail.
pub fn user_key(email: &str) -> String {
    format!("user:{}", email)
}

/// Cache key for a contact, scoped by owner.
pub fn contact_key(user_id: i64, contact_id: i64) -> String {
    format!("contact:{}:{}", user_id, contact_id)
}

/// Reads and deserializes a JSON value.
///
/// Undecodable entries (e.g. written by an older schema) are dropped and
/// reported as a miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, key, "Cache read failed");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, key, "Discarding undecodable cache entry");
            invalidate_quietly(cache, key).await;
            None
        }
    }
}

/// Serializes and stores a JSON value with the backend's default TTL.
pub async fn set_json<T: Serialize + Sync>(cache: &dyn CacheService, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => {
            if let Err(e) = cache.set(key, &raw, None).await {
                tracing::warn!(error = %e, key, "Cache write failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, key, "Failed to serialize cache entry"),
    }
}

/// Invalidates a key, logging instead of propagating failures.
pub async fn invalidate_quietly(cache: &dyn CacheService, key: &str) {
    if let Err(e) = cache.invalidate(key).await {
        tracing::warn!(error = %e, key, "Failed to invalidate cache");
    }
}
