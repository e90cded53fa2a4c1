//! Account status resolution and sliding-window session renewal.

use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use passport_core::error::PassportResult;
use passport_core::models::login_user::LoginUserStatus;
use passport_core::repository::SecurityPrincipalRepository;
use passport_core::support::StatusCache;

use crate::config::AuthConfig;

/// Resolves a user's current [`LoginUserStatus`], preferring the cache
/// and falling back to the durable store.
///
/// The store is authoritative. The cache is a TTL accelerator only: a
/// failed cache read is treated as a miss, a failed cache write is
/// logged and dropped, and [`passport_core::support::NoStatusCache`]
/// turns the whole thing into store-only resolution.
pub struct StatusResolver<P: SecurityPrincipalRepository, C: StatusCache> {
    principals: P,
    cache: C,
    cache_ttl: Duration,
    threshold_ms: i64,
    extension_ms: i64,
}

impl<P: SecurityPrincipalRepository, C: StatusCache> StatusResolver<P, C> {
    pub fn new(principals: P, cache: C, config: &AuthConfig) -> Self {
        Self {
            principals,
            cache,
            cache_ttl: Duration::from_secs(config.status_cache_ttl_secs),
            threshold_ms: config.renewal_threshold_secs as i64 * 1000,
            extension_ms: config.renewal_extension_secs as i64 * 1000,
        }
    }

    /// Resolve the current status for a user.
    ///
    /// Cache miss falls back to the store; an unknown user propagates
    /// the store's `NotFound`. A fresh store read carries
    /// `expire_at = 0`: no renewal has scheduled an expiry yet.
    pub async fn get_status(&self, user_id: Uuid) -> PassportResult<LoginUserStatus> {
        match self.cache.get(user_id).await {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                warn!(%user_id, error = %e, "status cache read failed, falling back to store");
            }
        }

        let principal = self.principals.find_by_user_id(user_id).await?;
        let status = LoginUserStatus::new(principal.status, 0);

        if let Err(e) = self.cache.set(user_id, &status, self.cache_ttl).await {
            warn!(%user_id, error = %e, "status cache population failed");
        }

        Ok(status)
    }

    /// Sliding-window renewal: when the remaining lifetime at `now_ms`
    /// falls below the threshold, push the expiry out by the configured
    /// extension. Returns whether the status changed.
    ///
    /// Idempotent at a fixed instant (a renewed status is outside the
    /// threshold again) and never decreases `expire_at`.
    pub fn renew(&self, status: &mut LoginUserStatus, now_ms: i64) -> bool {
        if status.expire_at - now_ms >= self.threshold_ms {
            return false;
        }
        let renewed = (now_ms + self.extension_ms).max(status.expire_at);
        status.expire_at = renewed;
        true
    }

    /// Best-effort cache write-through after a renewal. The store stays
    /// authoritative, so a failure here is logged and dropped.
    pub async fn set_status(&self, user_id: Uuid, status: &LoginUserStatus) {
        if let Err(e) = self.cache.set(user_id, status, self.cache_ttl).await {
            warn!(%user_id, error = %e, "status cache write-through failed");
        }
    }
}
