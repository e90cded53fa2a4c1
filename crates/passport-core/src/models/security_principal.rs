//! Durable account record, the source of truth for status resolution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::login_user::UserStatus;

/// The durable account record owned by the store collaborator.
///
/// Consulted on every status-cache miss; whatever this says overrides
/// anything a previously issued token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPrincipal {
    pub user_id: Uuid,
    pub user_name: String,
    pub status: UserStatus,
}
