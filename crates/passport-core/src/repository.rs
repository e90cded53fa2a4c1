//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The durable store behind these
//! traits is authoritative; caches layered in front of it are purely
//! accelerators.

use uuid::Uuid;

use crate::error::PassportResult;
use crate::models::registering_user::{CreateRegisteringUser, RegisteringUser};
use crate::models::security_principal::SecurityPrincipal;

pub trait SecurityPrincipalRepository: Send + Sync {
    /// Look up the durable account record for a user.
    ///
    /// Answers `NotFound` for unknown users; transport failures must
    /// surface as `Upstream`, never as absence.
    fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = PassportResult<SecurityPrincipal>> + Send;
}

pub trait RegisteringUserRepository: Send + Sync {
    /// Persist a new registration.
    ///
    /// Implementations must enforce email uniqueness atomically at the
    /// store level and answer `AlreadyExists` on conflict; under
    /// concurrent registrations for the same email the write conflict is
    /// the authoritative duplicate signal.
    fn create(
        &self,
        input: CreateRegisteringUser,
    ) -> impl Future<Output = PassportResult<RegisteringUser>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = PassportResult<RegisteringUser>> + Send;

    /// Persist an updated registration record (e.g. after activation).
    fn save(&self, user: &RegisteringUser) -> impl Future<Output = PassportResult<()>> + Send;
}
