//! Registration-in-progress domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegistrationState {
    /// Registered, activation email sent, link not yet followed.
    PendingActivation,
    Activated,
}

/// A registration-in-progress record, promoted to a durable account on
/// activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteringUser {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    /// Argon2id PHC-format hash. Also the account half of the
    /// activation-token key, so a password change invalidates every
    /// outstanding activation link.
    pub password_hash: String,
    pub state: RegistrationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegisteringUser {
    /// Mark the account activated. Idempotent.
    pub fn activate(&mut self) {
        self.state = RegistrationState::Activated;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegisteringUser {
    pub user_name: String,
    pub email: String,
    /// Already hashed; raw passwords never cross the repository
    /// boundary.
    pub password_hash: String,
}
