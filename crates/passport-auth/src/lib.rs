//! Passport Auth: HMAC-signed session tokens, account status
//! resolution with sliding-window renewal, password-hash-bound email
//! activation tokens, and the registration workflow.

pub mod activation;
pub mod authenticator;
pub mod config;
pub mod key;
pub mod password;
pub mod registration;
pub mod status;
pub mod token;

pub use activation::{ActivationClaims, ActivationTokenCodec, EmailTokenPair};
pub use authenticator::SessionAuthenticator;
pub use config::AuthConfig;
pub use registration::{RegisterByEmail, RegisteredLogin, RegistrationWorkflow};
pub use status::StatusResolver;
pub use token::TokenCodec;
