//! Domain models for Passport.
//!
//! These are the core types shared across all crates.

pub mod client;
pub mod login_user;
pub mod registering_user;
pub mod security_principal;
