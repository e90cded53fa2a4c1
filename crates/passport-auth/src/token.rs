//! Session token signing and verification.
//!
//! Wire format: `base64(payload_json) "." base64(hmac_sha1(payload_json,
//! key))`, standard alphabet, ASCII-safe. The signature is computed over
//! the canonical payload bytes (`serde_json` output with the struct's
//! declaration-order fields), never over the encoded wire string.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use passport_core::error::{PassportError, PassportResult};
use passport_core::models::login_user::LoginUser;

use crate::key::KeyCell;

type HmacSha1 = Hmac<Sha1>;

/// Canonical signing/verification primitive for session tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: KeyCell,
}

impl TokenCodec {
    pub fn new(configured_key: Option<String>) -> Self {
        Self {
            key: KeyCell::new(configured_key),
        }
    }

    /// Codec backed by a caller-supplied [`KeyCell`] (tests, custom
    /// environment variables).
    pub fn with_key_cell(key: KeyCell) -> Self {
        Self { key }
    }

    /// Sign a [`LoginUser`] into an opaque bearer token.
    pub fn sign(&self, login_user: &LoginUser) -> PassportResult<String> {
        let key = self.key.resolve()?;
        let payload = serde_json::to_string(login_user)
            .map_err(|e| PassportError::Crypto(format!("payload encode: {e}")))?;

        let mac = mac_over(key, payload.as_bytes())?;
        Ok(format!(
            "{}.{}",
            STANDARD.encode(payload.as_bytes()),
            STANDARD.encode(mac)
        ))
    }

    /// Verify a bearer token and recover its identity claims.
    ///
    /// Failure taxonomy: wrong segment count or undecodable payload is
    /// `TokenFormat`; a signature that does not match the recomputed MAC
    /// is `TokenSignature`; a valid signature over an unparseable
    /// payload is `TokenFormat` (the signer never produces one).
    pub fn verify(&self, token: &str) -> PassportResult<LoginUser> {
        let key = self.key.resolve()?;

        let mut segments = token.split('.');
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

        // A signature segment that does not even decode cannot match.
        let signature = STANDARD
            .decode(signature_b64)
            .map_err(|_| PassportError::TokenSignature)?;

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| PassportError::Crypto(format!("hmac key: {e}")))?;
        mac.update(payload.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&signature)
            .map_err(|_| PassportError::TokenSignature)?;

        serde_json::from_str(&payload)
            .map_err(|e| PassportError::TokenFormat(format!("payload parse: {e}")))
    }
}

fn mac_over(key: &str, message: &[u8]) -> PassportResult<Vec<u8>> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| PassportError::Crypto(format!("hmac key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn codec() -> TokenCodec {
        TokenCodec::new(Some("unit-test-key".into()))
    }

    fn sample_user() -> LoginUser {
        LoginUser::new(
            Uuid::new_v4(),
            "alice",
            "avatars/a.png",
            "device-7",
            1_700_000_000_000,
            1_700_003_600_000,
        )
    }

    #[test]
    fn sign_verify_roundtrip() {
        let codec = codec();
        let user = sample_user();
        let token = codec.sign(&user).unwrap();
        let recovered = codec.verify(&token).unwrap();
        assert_eq!(recovered, user);
    }

    #[test]
    fn token_has_exactly_one_separator() {
        let codec = codec();
        let token = codec.sign(&sample_user()).unwrap();
        assert_eq!(token.matches('.').count(), 1);
        assert!(token.is_ascii());
    }

    #[test]
    fn missing_separator_is_format_error() {
        let err = codec().verify("abc").unwrap_err();
        assert!(matches!(err, PassportError::TokenFormat(_)), "{err:?}");
    }

    #[test]
    fn three_segments_is_format_error() {
        let err = codec().verify("a.b.c").unwrap_err();
        assert!(matches!(err, PassportError::TokenFormat(_)));
    }

    #[test]
    fn undecodable_payload_is_format_error() {
        let err = codec().verify("!!!not-base64!!!.c2ln").unwrap_err();
        assert!(matches!(err, PassportError::TokenFormat(_)));
    }

    #[test]
    fn bad_signature_is_signature_error() {
        let codec = codec();
        let token = codec.sign(&sample_user()).unwrap();
        let payload = token.split('.').next().unwrap();
        let err = codec.verify(&format!("{payload}.YmFkc2ln")).unwrap_err();
        assert!(matches!(err, PassportError::TokenSignature));
    }

    #[test]
    fn tampered_payload_is_signature_error() {
        let codec = codec();
        let token = codec.sign(&sample_user()).unwrap();
        let (payload, signature) = token.split_once('.').unwrap();

        // Swap one base64 character for another valid one so the
        // segment still decodes but the bytes differ.
        let mut chars: Vec<char> = payload.chars().collect();
        chars[1] = if chars[1] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        let err = codec.verify(&format!("{tampered}.{signature}")).unwrap_err();
        assert!(
            matches!(
                err,
                PassportError::TokenSignature | PassportError::TokenFormat(_)
            ),
            "{err:?}"
        );
    }

    #[test]
    fn tampered_signature_is_signature_error() {
        let codec = codec();
        let token = codec.sign(&sample_user()).unwrap();
        let (payload, signature) = token.split_once('.').unwrap();

        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        let err = codec.verify(&format!("{payload}.{tampered}")).unwrap_err();
        assert!(matches!(err, PassportError::TokenSignature));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let token = codec().sign(&sample_user()).unwrap();
        let other = TokenCodec::new(Some("another-key".into()));
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, PassportError::TokenSignature));
    }
}
