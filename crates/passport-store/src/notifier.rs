//! Post-registration notifier doubles.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use passport_core::error::PassportResult;
use passport_core::models::client::ClientInfo;
use passport_core::support::RegistrationNotifier;

/// Records every notification it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Uuid>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn notified(&self) -> Vec<Uuid> {
        self.events.lock().await.clone()
    }
}

impl RegistrationNotifier for RecordingNotifier {
    async fn registered(&self, user_id: Uuid, _client: &ClientInfo) -> PassportResult<()> {
        self.events.lock().await.push(user_id);
        Ok(())
    }
}
