//! Per-request client facts.

use serde::{Deserialize, Serialize};

/// Facts about the requesting client, supplied by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Source address, used as the rate-limit key.
    pub ip: String,
    /// Device identifier embedded in issued session tokens.
    pub device_id: String,
}

impl ClientInfo {
    pub fn new(ip: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            device_id: device_id.into(),
        }
    }
}
