//! Passport Core: domain models, error taxonomy, and the repository /
//! collaborator traits the authentication layer is built against.
//!
//! This crate performs no I/O. Concrete stores, caches, and transports
//! implement the traits defined here (see `passport-store` for the
//! in-memory implementations used in tests and local development).

pub mod error;
pub mod models;
pub mod repository;
pub mod support;

pub use error::{PassportError, PassportResult};
