//! Passport Store: in-memory implementations of the repository and
//! collaborator traits.
//!
//! These back the integration tests and local development. The
//! registering-user store enforces the same email-uniqueness constraint
//! a durable store would, so workflow code exercises the exact
//! write-conflict path it sees in production.

mod cache;
mod email;
mod limiter;
mod notifier;
mod store;

pub use cache::MemoryStatusCache;
pub use email::{OutboxEmailSender, SentEmail};
pub use limiter::MemoryRegistrationLimiter;
pub use notifier::RecordingNotifier;
pub use store::MemoryPassportStore;
