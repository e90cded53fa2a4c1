//! Lazy, initialize-once resolution of the session signing key.

use std::sync::OnceLock;

use passport_core::error::{PassportError, PassportResult};

/// Environment variable consulted when no key is configured.
pub const ENCRYPT_KEY_ENV: &str = "PASSPORT_ENCRYPT_KEY";

/// An initialize-once, read-many signing-key cell.
///
/// Resolution order: the externally configured value, else the process
/// environment. Resolution happens at most once per cell; after that the
/// key is immutable and shared without further synchronization. Racing
/// first callers may both compute the value, but `OnceLock` guarantees
/// they converge on a single stored result.
#[derive(Debug, Clone)]
pub struct KeyCell {
    configured: Option<String>,
    env_var: &'static str,
    cell: OnceLock<Option<String>>,
}

impl KeyCell {
    pub fn new(configured: Option<String>) -> Self {
        Self::with_env_var(configured, ENCRYPT_KEY_ENV)
    }

    /// Same as [`KeyCell::new`] with a custom environment variable name.
    pub fn with_env_var(configured: Option<String>, env_var: &'static str) -> Self {
        Self {
            configured,
            env_var,
            cell: OnceLock::new(),
        }
    }

    /// Resolve the key, performing the lookup on first call only.
    pub fn resolve(&self) -> PassportResult<&str> {
        let slot = self.cell.get_or_init(|| {
            self.configured
                .clone()
                .or_else(|| std::env::var(self.env_var).ok())
        });
        slot.as_deref().ok_or_else(|| {
            PassportError::Crypto(format!(
                "no signing key: configure encrypt_key or set {}",
                self.env_var
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_key_wins() {
        let cell = KeyCell::new(Some("from-config".into()));
        assert_eq!(cell.resolve().unwrap(), "from-config");
    }

    #[test]
    fn falls_back_to_environment() {
        // Dedicated variable name so other tests cannot interfere.
        unsafe { std::env::set_var("PASSPORT_TEST_KEY_FALLBACK", "from-env") };
        let cell = KeyCell::with_env_var(None, "PASSPORT_TEST_KEY_FALLBACK");
        assert_eq!(cell.resolve().unwrap(), "from-env");
    }

    #[test]
    fn missing_key_is_an_error() {
        let cell = KeyCell::with_env_var(None, "PASSPORT_TEST_KEY_UNSET");
        assert!(matches!(
            cell.resolve(),
            Err(PassportError::Crypto(_))
        ));
    }

    #[test]
    fn resolution_is_sticky() {
        unsafe { std::env::set_var("PASSPORT_TEST_KEY_STICKY", "first") };
        let cell = KeyCell::with_env_var(None, "PASSPORT_TEST_KEY_STICKY");
        assert_eq!(cell.resolve().unwrap(), "first");

        // A later environment change must not be observed.
        unsafe { std::env::set_var("PASSPORT_TEST_KEY_STICKY", "second") };
        assert_eq!(cell.resolve().unwrap(), "first");
    }
}
