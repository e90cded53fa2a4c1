//! In-memory account store: security principals and registrations.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use passport_core::error::{PassportError, PassportResult};
use passport_core::models::login_user::UserStatus;
use passport_core::models::registering_user::{
    CreateRegisteringUser, RegistrationState, RegisteringUser,
};
use passport_core::models::security_principal::SecurityPrincipal;
use passport_core::repository::{RegisteringUserRepository, SecurityPrincipalRepository};

#[derive(Default)]
struct StoreState {
    principals: HashMap<Uuid, SecurityPrincipal>,
    /// Keyed by email; the map key is the uniqueness constraint.
    registering_by_email: HashMap<String, RegisteringUser>,
}

/// In-memory store implementing both repository traits over one shared
/// state, the way a durable store would expose two query surfaces over
/// one account table.
///
/// `create` checks and inserts under a single write-lock acquisition,
/// so concurrent registrations for the same email resolve exactly like
/// a database unique index: one writer wins, the rest observe
/// `AlreadyExists`.
#[derive(Clone, Default)]
pub struct MemoryPassportStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryPassportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a principal directly (tests).
    pub async fn insert_principal(&self, principal: SecurityPrincipal) {
        let mut state = self.state.write().await;
        state.principals.insert(principal.user_id, principal);
    }

    /// Flip an account's status code. Returns `false` for unknown users.
    pub async fn set_principal_status(&self, user_id: Uuid, status: UserStatus) -> bool {
        let mut state = self.state.write().await;
        match state.principals.get_mut(&user_id) {
            Some(principal) => {
                principal.status = status;
                true
            }
            None => false,
        }
    }

    /// Replace a registration's password hash (tests; models a
    /// password change invalidating outstanding activation links).
    pub async fn set_password_hash(&self, email: &str, password_hash: &str) -> bool {
        let mut state = self.state.write().await;
        match state.registering_by_email.get_mut(email) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

impl SecurityPrincipalRepository for MemoryPassportStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> PassportResult<SecurityPrincipal> {
        let state = self.state.read().await;
        state
            .principals
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PassportError::NotFound {
                entity: "security_principal".into(),
                id: user_id.to_string(),
            })
    }
}

impl RegisteringUserRepository for MemoryPassportStore {
    async fn create(&self, input: CreateRegisteringUser) -> PassportResult<RegisteringUser> {
        let mut state = self.state.write().await;
        if state.registering_by_email.contains_key(&input.email) {
            return Err(PassportError::AlreadyExists {
                entity: "registering_user".into(),
            });
        }

        let now = Utc::now();
        let user = RegisteringUser {
            id: Uuid::new_v4(),
            user_name: input.user_name,
            email: input.email,
            password_hash: input.password_hash,
            state: RegistrationState::PendingActivation,
            created_at: now,
            updated_at: now,
        };

        state.principals.insert(
            user.id,
            SecurityPrincipal {
                user_id: user.id,
                user_name: user.user_name.clone(),
                status: UserStatus::Normal,
            },
        );
        state
            .registering_by_email
            .insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> PassportResult<RegisteringUser> {
        let state = self.state.read().await;
        state
            .registering_by_email
            .get(email)
            .cloned()
            .ok_or_else(|| PassportError::NotFound {
                entity: "registering_user".into(),
                id: email.to_string(),
            })
    }

    async fn save(&self, user: &RegisteringUser) -> PassportResult<()> {
        let mut state = self.state.write().await;
        if !state.registering_by_email.contains_key(&user.email) {
            return Err(PassportError::NotFound {
                entity: "registering_user".into(),
                id: user.email.clone(),
            });
        }
        state
            .registering_by_email
            .insert(user.email.clone(), user.clone());
        if let Some(principal) = state.principals.get_mut(&user.id) {
            principal.user_name = user.user_name.clone();
        }
        Ok(())
    }
}
