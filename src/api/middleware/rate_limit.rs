//! Rate limiting: per-IP token buckets for public routes and a per-user
//! quota for contact creation.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

use crate::error::AppError;

/// Creates a per-IP rate limiter for the public authentication routes.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 20 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Pass `PeerIpKeyExtractor` to key on the socket peer address, or
/// `SmartIpKeyExtractor` to honour `X-Forwarded-For` / `X-Real-IP` when the
/// service runs behind a trusted reverse proxy.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/login", post(login_handler))
///     .layer(rate_limit::layer(PeerIpKeyExtractor));
/// ```
pub fn layer<K>(key_extractor: K) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(2)
            .burst_size(20)
            .finish()
            .expect("non-zero rate limit settings"),
    );

    GovernorLayer::new(governor_conf)
}

/// Keyed limiter allowing each user a fixed number of operations per minute.
///
/// The full quota is available as a burst and refills evenly over the minute.
pub struct UserRateLimiter {
    limiter: DefaultKeyedRateLimiter<i64>,
    per_minute: NonZeroU32,
}

impl UserRateLimiter {
    /// Creates a limiter with `per_minute` operations per user (minimum 1).
    pub fn per_minute(per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            per_minute,
        }
    }

    /// Consumes one unit of `user_id`'s quota.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TooManyRequests`] when the quota is exhausted.
    pub fn check(&self, user_id: i64) -> Result<(), AppError> {
        self.limiter.check_key(&user_id).map_err(|_| {
            tracing::debug!(user_id, "Per-user rate limit exceeded");
            AppError::too_many_requests(
                "Too many requests",
                json!({ "limit_per_minute": self.per_minute.get() }),
            )
        })
    }
}
