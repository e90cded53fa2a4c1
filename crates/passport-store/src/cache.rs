//! In-memory TTL cache for status records.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use passport_core::error::PassportResult;
use passport_core::models::login_user::LoginUserStatus;
use passport_core::support::StatusCache;

/// A get/set-with-TTL cache backed by a guarded map. Expired entries
/// answer `None`; they are evicted lazily on the next write.
#[derive(Clone, Default)]
pub struct MemoryStatusCache {
    entries: Arc<RwLock<HashMap<Uuid, (LoginUserStatus, Instant)>>>,
}

impl MemoryStatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|(_, deadline)| *deadline > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl StatusCache for MemoryStatusCache {
    async fn get(&self, user_id: Uuid) -> PassportResult<Option<LoginUserStatus>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&user_id).and_then(|(status, deadline)| {
            if *deadline > Instant::now() {
                Some(status.clone())
            } else {
                None
            }
        }))
    }

    async fn set(
        &self,
        user_id: Uuid,
        status: &LoginUserStatus,
        ttl: Duration,
    ) -> PassportResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.insert(user_id, (status.clone(), now + ttl));
        Ok(())
    }
}
