//! The single authorization decision point for authenticated requests.

use chrono::Utc;
use tracing::debug;

use passport_core::error::{PassportError, PassportResult};
use passport_core::models::login_user::{LoginUser, LoginUserStatus, UserStatus};
use passport_core::repository::SecurityPrincipalRepository;
use passport_core::support::StatusCache;

use crate::status::StatusResolver;
use crate::token::TokenCodec;

/// Composes the token codec and status resolver into the one
/// authorization decision every authenticated endpoint must make.
///
/// Status is deliberately not embedded in the signed token: `verify`
/// re-resolves it on every call, so disabling or deleting an account in
/// the store revokes access on the very next request without reissuing
/// any token.
pub struct SessionAuthenticator<P: SecurityPrincipalRepository, C: StatusCache> {
    codec: TokenCodec,
    resolver: StatusResolver<P, C>,
}

impl<P: SecurityPrincipalRepository, C: StatusCache> SessionAuthenticator<P, C> {
    pub fn new(codec: TokenCodec, resolver: StatusResolver<P, C>) -> Self {
        Self { codec, resolver }
    }

    /// Issue a session token over the canonical serialization of
    /// `login_user`.
    pub fn sign(&self, login_user: &LoginUser) -> PassportResult<String> {
        self.codec.sign(login_user)
    }

    /// Verify a bearer token, resolve the account's current status,
    /// apply sliding-window renewal, and return both.
    ///
    /// Failures: tamper/shape problems from the codec; `AccountState`
    /// for disabled, deleted, or vanished accounts; `TokenExpired` when
    /// a previously scheduled session expiry has elapsed.
    pub async fn verify(&self, token: &str) -> PassportResult<(LoginUser, LoginUserStatus)> {
        let login_user = self.codec.verify(token)?;

        let mut status = match self.resolver.get_status(login_user.user_id).await {
            Err(PassportError::NotFound { .. }) => {
                return Err(PassportError::AccountState {
                    reason: "account not found".into(),
                });
            }
            other => other?,
        };

        match status.status {
            UserStatus::Normal => {}
            UserStatus::Disabled => {
                return Err(PassportError::AccountState {
                    reason: "account is disabled".into(),
                });
            }
            UserStatus::Deleted => {
                return Err(PassportError::AccountState {
                    reason: "account is deleted".into(),
                });
            }
        }

        let now = Utc::now().timestamp_millis();
        // `0` is the fresh-from-store sentinel, not an elapsed expiry.
        if status.expire_at > 0 && status.expire_at <= now {
            return Err(PassportError::TokenExpired);
        }

        if self.resolver.renew(&mut status, now) {
            debug!(user_id = %login_user.user_id, expire_at = status.expire_at, "session renewed");
            self.resolver.set_status(login_user.user_id, &status).await;
        }

        Ok((login_user, status))
    }
}
