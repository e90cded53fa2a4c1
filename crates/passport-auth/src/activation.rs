//! Email activation tokens.
//!
//! A second token family, structurally the same `payload.signature`
//! construction as session tokens but with two twists:
//!
//! - the signing key is *derived per account* from the server activation
//!   secret and the account's current password hash, so changing the
//!   password implicitly invalidates every outstanding link without a
//!   revocation list;
//! - the full `payload.signature` string is base64-wrapped a second time
//!   (URL-safe alphabet) so the token can ride in an email link.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use uuid::Uuid;

use passport_core::error::{PassportError, PassportResult};

type HmacSha1 = Hmac<Sha1>;

/// One-time activation payload. Canonical serde field order, same rules
/// as the session token payload.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ActivationClaims {
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
    /// The account's password hash *at issuance*. Verification rederives
    /// the key from the *currently stored* hash, so this also documents
    /// which credential generation the link belongs to.
    pub password_hash: String,
    /// Issue instant, epoch milliseconds.
    pub issued_at: i64,
}

impl ActivationClaims {
    pub fn new(
        user_id: Uuid,
        user_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        issued_at: i64,
    ) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            issued_at,
        }
    }

    /// Bind check against the account the caller actually loaded;
    /// defends against stale links surviving a username change.
    pub fn matches_user_name(&self, expected: &str) -> bool {
        self.user_name == expected
    }
}

/// The raw payload/signature split recovered from an outer-decoded
/// token, prior to any verification.
///
/// The embedded claims are *unverified*: they are exposed so the caller
/// can look up the account (by email) whose current password hash the
/// signature must then be checked against.
#[derive(Debug, Clone)]
pub struct EmailTokenPair {
    payload: String,
    signature_b64: String,
    claims: ActivationClaims,
}

impl EmailTokenPair {
    /// Unverified claims; do not trust before [`ActivationTokenCodec::verify`].
    pub fn claims(&self) -> &ActivationClaims {
        &self.claims
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

/// Codec for the activation token family.
#[derive(Debug, Clone)]
pub struct ActivationTokenCodec {
    secret: String,
    ttl_ms: i64,
}

impl ActivationTokenCodec {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_ms: ttl_secs as i64 * 1000,
        }
    }

    /// Per-account signing key: HMAC-SHA1 of the password hash keyed by
    /// the server secret.
    fn derive_key(&self, password_hash: &str) -> PassportResult<Vec<u8>> {
        let mut mac = HmacSha1::new_from_slice(self.secret.as_bytes())
            .map_err(|e| PassportError::Crypto(format!("derive key: {e}")))?;
        mac.update(password_hash.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Mint an opaque, URL-safe activation token.
    pub fn create_token(&self, claims: &ActivationClaims) -> PassportResult<String> {
        let payload = serde_json::to_string(claims)
            .map_err(|e| PassportError::Crypto(format!("payload encode: {e}")))?;

        let key = self.derive_key(&claims.password_hash)?;
        let mut mac = HmacSha1::new_from_slice(&key)
            .map_err(|e| PassportError::Crypto(format!("hmac key: {e}")))?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        let inner = format!(
            "{}.{}",
            STANDARD.encode(payload.as_bytes()),
            STANDARD.encode(signature)
        );
        Ok(URL_SAFE_NO_PAD.encode(inner.as_bytes()))
    }

    /// Outer-decode and split a token. Performs no verification.
    pub fn parse(&self, outer_token: &str) -> PassportResult<EmailTokenPair> {
        let inner_bytes = URL_SAFE_NO_PAD
            .decode(outer_token.trim())
            .map_err(|e| PassportError::TokenFormat(format!("outer wrapping: {e}")))?;
        let inner = String::from_utf8(inner_bytes)
            .map_err(|_| PassportError::TokenFormat("outer wrapping is not UTF-8".into()))?;

        let mut segments = inner.split('.');
        let (payload_b64, signature_b64) = match (segments.next(), segments.next(), segments.next())
        {
            (Some(p), Some(s), None) => (p, s),
            _ => {
                return Err(PassportError::TokenFormat(
                    "expected exactly two dot-separated segments".into(),
                ));
            }
        };

        let payload_bytes = STANDARD
            .decode(payload_b64)
            .map_err(|e| PassportError::TokenFormat(format!("payload segment: {e}")))?;
        let payload = String::from_utf8(payload_bytes)
            .map_err(|_| PassportError::TokenFormat("payload is not valid UTF-8".into()))?;
        let claims: ActivationClaims = serde_json::from_str(&payload)
            .map_err(|e| PassportError::TokenFormat(format!("payload parse: {e}")))?;

        Ok(EmailTokenPair {
            payload,
            signature_b64: signature_b64.to_string(),
            claims,
        })
    }

    /// Verify a parsed pair against the account's *current* password
    /// hash.
    ///
    /// TTL is checked first (`TokenExpired`), then the signature is
    /// recomputed with the rederived key and compared constant-time
    /// (`TokenSignature`).
    pub fn verify(
        &self,
        pair: &EmailTokenPair,
        current_password_hash: &str,
    ) -> PassportResult<ActivationClaims> {
        let now = Utc::now().timestamp_millis();
        if now - pair.claims.issued_at > self.ttl_ms {
            return Err(PassportError::TokenExpired);
        }

        let signature = STANDARD
            .decode(&pair.signature_b64)
            .map_err(|_| PassportError::TokenSignature)?;

        let key = self.derive_key(current_password_hash)?;
        let mut mac = HmacSha1::new_from_slice(&key)
            .map_err(|e| PassportError::Crypto(format!("hmac key: {e}")))?;
        mac.update(pair.payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| PassportError::TokenSignature)?;

        Ok(pair.claims.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> ActivationTokenCodec {
        ActivationTokenCodec::new("server-secret", 86_400)
    }

    fn claims_with(password_hash: &str, issued_at: i64) -> ActivationClaims {
        ActivationClaims::new(
            Uuid::new_v4(),
            "alice",
            "alice@example.com",
            password_hash,
            issued_at,
        )
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    #[test]
    fn create_parse_verify_roundtrip() {
        let codec = codec();
        let claims = claims_with("hash-v1", now_ms());

        let token = codec.create_token(&claims).unwrap();
        let pair = codec.parse(&token).unwrap();
        assert_eq!(pair.email(), "alice@example.com");

        let verified = codec.verify(&pair, "hash-v1").unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn token_is_url_safe() {
        let codec = codec();
        let token = codec.create_token(&claims_with("h", now_ms())).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn password_change_invalidates_token() {
        let codec = codec();
        let token = codec.create_token(&claims_with("hash-v1", now_ms())).unwrap();
        let pair = codec.parse(&token).unwrap();

        let err = codec.verify(&pair, "hash-v2").unwrap_err();
        assert!(matches!(err, PassportError::TokenSignature));
    }

    #[test]
    fn expired_token_fails_before_signature_check() {
        let codec = ActivationTokenCodec::new("server-secret", 60);
        let issued_at = now_ms() - 120_000;
        let token = codec.create_token(&claims_with("hash-v1", issued_at)).unwrap();
        let pair = codec.parse(&token).unwrap();

        let err = codec.verify(&pair, "hash-v1").unwrap_err();
        assert!(matches!(err, PassportError::TokenExpired));
    }

    #[test]
    fn different_server_secret_invalidates_token() {
        let token = codec().create_token(&claims_with("h", now_ms())).unwrap();
        let other = ActivationTokenCodec::new("another-secret", 86_400);
        let pair = other.parse(&token).unwrap();
        let err = other.verify(&pair, "h").unwrap_err();
        assert!(matches!(err, PassportError::TokenSignature));
    }

    #[test]
    fn garbage_outer_token_is_format_error() {
        let err = codec().parse("%%%not-base64%%%").unwrap_err();
        assert!(matches!(err, PassportError::TokenFormat(_)));
    }

    #[test]
    fn missing_separator_is_format_error() {
        let outer = URL_SAFE_NO_PAD.encode("justonesegment");
        let err = codec().parse(&outer).unwrap_err();
        assert!(matches!(err, PassportError::TokenFormat(_)));
    }

    #[test]
    fn user_name_bind_check() {
        let claims = claims_with("h", now_ms());
        assert!(claims.matches_user_name("alice"));
        assert!(!claims.matches_user_name("renamed"));
    }
}
