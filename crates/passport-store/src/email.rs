//! Outbox email transport for tests and local development.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use passport_core::error::PassportResult;
use passport_core::support::EmailSender;

/// A dispatched email, as recorded by [`OutboxEmailSender`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub locale: String,
}

/// Records every send instead of talking to a real transport.
#[derive(Clone, Default)]
pub struct OutboxEmailSender {
    outbox: Arc<Mutex<Vec<SentEmail>>>,
}

impl OutboxEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().await.clone()
    }
}

impl EmailSender for OutboxEmailSender {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        locale: &str,
    ) -> PassportResult<()> {
        info!(recipient, subject, locale, "email recorded in outbox");
        self.outbox.lock().await.push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            locale: locale.to_string(),
        });
        Ok(())
    }
}
