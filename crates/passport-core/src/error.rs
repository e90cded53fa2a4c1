//! Error types for the Passport system.
//!
//! Every failure that reaches a caller carries a stable,
//! client-displayable code via [`PassportError::code`]. Cache misses are
//! recovered internally (store fallback) and never appear here; cache and
//! store *transport* failures surface as [`PassportError::Upstream`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassportError {
    /// Malformed token: wrong segment count, bad base64, or an
    /// unparseable payload.
    #[error("malformed token: {0}")]
    TokenFormat(String),

    /// Signature mismatch: tampered token or wrong key.
    #[error("token signature mismatch")]
    TokenSignature,

    #[error("token has expired")]
    TokenExpired,

    /// The account exists but its state forbids access
    /// (disabled or deleted).
    #[error("account state forbids access: {reason}")]
    AccountState { reason: String },

    #[error("entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness conflict on write, the authoritative duplicate
    /// signal for concurrent registrations.
    #[error("entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("validation error: {message}")]
    Validation { message: String },

    /// A store/cache/email collaborator was unreachable or failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl PassportError {
    /// Stable code for client display and log correlation.
    ///
    /// These strings are part of the external contract; do not rename
    /// them.
    pub fn code(&self) -> &'static str {
        match self {
            PassportError::TokenFormat(_) => "PASSPORT_TOKEN_FORMAT",
            PassportError::TokenSignature => "PASSPORT_TOKEN_SIGNATURE",
            PassportError::TokenExpired => "PASSPORT_TOKEN_EXPIRED",
            PassportError::AccountState { .. } => "PASSPORT_ACCOUNT_STATE",
            PassportError::NotFound { .. } => "PASSPORT_NOT_FOUND",
            PassportError::AlreadyExists { .. } => "PASSPORT_DUPLICATE",
            PassportError::RateLimited => "PASSPORT_RATE_LIMITED",
            PassportError::Validation { .. } => "PASSPORT_VALIDATION",
            PassportError::Upstream(_) => "PASSPORT_UPSTREAM",
            PassportError::Crypto(_) => "PASSPORT_CRYPTO",
        }
    }
}

pub type PassportResult<T> = Result<T, PassportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            PassportError::TokenFormat("x".into()).code(),
            "PASSPORT_TOKEN_FORMAT"
        );
        assert_eq!(
            PassportError::TokenSignature.code(),
            "PASSPORT_TOKEN_SIGNATURE"
        );
        assert_eq!(PassportError::RateLimited.code(), "PASSPORT_RATE_LIMITED");
        assert_eq!(
            PassportError::AlreadyExists {
                entity: "registering_user".into()
            }
            .code(),
            "PASSPORT_DUPLICATE"
        );
    }
}
