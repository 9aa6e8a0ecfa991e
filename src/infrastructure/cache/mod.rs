//! Caching layer in front of the relational store.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for testing/disabled caching
//!
//! Values are stored as JSON; see [`get_json`] / [`set_json`].

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{
    CacheError, CacheResult, CacheService, contact_key, get_json, invalidate_quietly, set_json,
    user_key,
};

#[cfg(test)]
pub use service::MockCacheService;
