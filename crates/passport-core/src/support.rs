//! Collaborator traits consumed by the authentication core.
//!
//! These cover the side channels around the store: the status cache, the
//! outbound email transport, registration rate limiting, and the
//! optional post-registration notifier. Each is a seam: the core works
//! against the trait, and absence or failure of the collaborator
//! degrades rather than breaks (see the individual contracts).

use std::time::Duration;

use uuid::Uuid;

use crate::error::PassportResult;
use crate::models::client::ClientInfo;
use crate::models::login_user::LoginUserStatus;

/// A TTL cache for [`LoginUserStatus`] records.
///
/// `get` distinguishes "absent" (`Ok(None)`, where the caller must fall
/// back to the store) from "present". Transport failures are `Err`; callers
/// treat a failed `get` as a miss and a failed `set` as ignorable, so an
/// unavailable cache degrades to store-only resolution.
pub trait StatusCache: Send + Sync {
    fn get(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = PassportResult<Option<LoginUserStatus>>> + Send;

    fn set(
        &self,
        user_id: Uuid,
        status: &LoginUserStatus,
        ttl: Duration,
    ) -> impl Future<Output = PassportResult<()>> + Send;
}

/// The degraded mode of [`StatusCache`]: every read misses, every write
/// is dropped. Resolution falls through to the store on each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatusCache;

impl StatusCache for NoStatusCache {
    async fn get(&self, _user_id: Uuid) -> PassportResult<Option<LoginUserStatus>> {
        Ok(None)
    }

    async fn set(
        &self,
        _user_id: Uuid,
        _status: &LoginUserStatus,
        _ttl: Duration,
    ) -> PassportResult<()> {
        Ok(())
    }
}

/// Outbound email transport.
pub trait EmailSender: Send + Sync {
    fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        locale: &str,
    ) -> impl Future<Output = PassportResult<()>> + Send;
}

/// Per-source-address registration rate limit.
pub trait RegistrationLimiter: Send + Sync {
    /// `Ok(())` to admit, `RateLimited` to reject.
    fn check(&self, source_ip: &str) -> impl Future<Output = PassportResult<()>> + Send;
}

/// Best-effort post-registration event hook.
///
/// Invoked after a successful registration. Failures are logged and
/// swallowed by the caller; they must never fail the registration.
pub trait RegistrationNotifier: Send + Sync {
    fn registered(
        &self,
        user_id: Uuid,
        client: &ClientInfo,
    ) -> impl Future<Output = PassportResult<()>> + Send;
}
