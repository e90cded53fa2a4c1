//! Authentication configuration.

/// Configuration for the authentication core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric HMAC key for session tokens. `None` falls back to the
    /// `PASSPORT_ENCRYPT_KEY` environment variable at first use.
    pub encrypt_key: Option<String>,
    /// Server-wide half of the activation-token derived key. The other
    /// half is the account's current password hash.
    pub activation_secret: String,
    /// Initial session lifetime in seconds (default: 3600 = 1 hour).
    pub session_lifetime_secs: u64,
    /// Sliding-window renewal threshold in seconds: a session whose
    /// remaining lifetime drops below this is extended
    /// (default: 1800 = 30 minutes).
    pub renewal_threshold_secs: u64,
    /// Extension granted by a renewal, in seconds
    /// (default: 3600 = 1 hour).
    pub renewal_extension_secs: u64,
    /// Activation-link lifetime in seconds (default: 86_400 = 24 hours).
    pub activation_token_ttl_secs: u64,
    /// TTL for cached status records (default: 3600 = 1 hour).
    pub status_cache_ttl_secs: u64,
    /// Avatar assigned to freshly registered accounts.
    pub default_avatar: String,
    /// Locale passed to the email transport.
    pub language: String,
    /// Subject line of the activation email.
    pub activation_subject: String,
    /// URL prefix the activation token is appended to.
    pub activation_link_base: String,
    /// Minimum password length for registration (default: 8).
    pub min_password_length: usize,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            encrypt_key: None,
            activation_secret: String::new(),
            session_lifetime_secs: 3600,
            renewal_threshold_secs: 1800,
            renewal_extension_secs: 3600,
            activation_token_ttl_secs: 86_400,
            status_cache_ttl_secs: 3600,
            default_avatar: "avatars/default.png".into(),
            language: "en".into(),
            activation_subject: "Activate your account".into(),
            activation_link_base: "https://example.com/activate?token=".into(),
            min_password_length: 8,
            pepper: None,
        }
    }
}
