//! Session identity claims and the mutable per-user status record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable identity claims embedded in a session token.
///
/// The serde field order below is the canonical signing order: the token
/// signature is computed over `serde_json::to_string(&login_user)`, so
/// reordering, renaming, or adding fields breaks verification of every
/// outstanding token. Treat the declaration order as part of the wire
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginUser {
    pub user_id: Uuid,
    pub user_name: String,
    /// Avatar reference (URL or asset key), display-only.
    pub avatar: String,
    /// Device the token was issued to.
    pub device_id: String,
    /// Issue instant, epoch milliseconds.
    pub issued_at: i64,
    /// Claimed expiry, epoch milliseconds. The authoritative expiry
    /// lives in [`LoginUserStatus`], which is renewed server-side.
    pub expire_at: i64,
}

impl LoginUser {
    pub fn new(
        user_id: Uuid,
        user_name: impl Into<String>,
        avatar: impl Into<String>,
        device_id: impl Into<String>,
        issued_at: i64,
        expire_at: i64,
    ) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            avatar: avatar.into(),
            device_id: device_id.into(),
            issued_at,
            expire_at,
        }
    }
}

/// Account status codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    Normal,
    Disabled,
    Deleted,
}

/// Mutable, externally cached per-user session state.
///
/// Deliberately *not* embedded in the signed token: it is re-resolved on
/// every request, so flipping [`UserStatus`] in the store revokes access
/// immediately without reissuing tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginUserStatus {
    pub status: UserStatus,
    /// Session expiry, epoch milliseconds. `0` means "not yet
    /// scheduled": the value a fresh store read produces before the
    /// first sliding-window renewal.
    pub expire_at: i64,
}

impl LoginUserStatus {
    pub fn new(status: UserStatus, expire_at: i64) -> Self {
        Self { status, expire_at }
    }

    /// Whether the status code permits authentication at all.
    pub fn permits_access(&self) -> bool {
        self.status == UserStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_serialization_is_stable() {
        let user = LoginUser::new(
            Uuid::nil(),
            "alice",
            "avatars/default.png",
            "device-1",
            1_000,
            2_000,
        );
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(
            json,
            "{\"user_id\":\"00000000-0000-0000-0000-000000000000\",\
             \"user_name\":\"alice\",\
             \"avatar\":\"avatars/default.png\",\
             \"device_id\":\"device-1\",\
             \"issued_at\":1000,\
             \"expire_at\":2000}"
        );
    }

    #[test]
    fn only_normal_status_permits_access() {
        assert!(LoginUserStatus::new(UserStatus::Normal, 0).permits_access());
        assert!(!LoginUserStatus::new(UserStatus::Disabled, 0).permits_access());
        assert!(!LoginUserStatus::new(UserStatus::Deleted, 0).permits_access());
    }
}
