use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Id and creation time shared by every chunk (or the single document) of
/// one completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseIdentity {
    /// `chatcmpl-` followed by a random UUID
    pub id: String,
    /// Unix seconds at the moment the response started
    pub created: u64,
}

impl ResponseIdentity {
    /// Mint a fresh identity stamped with the current time
    pub fn new() -> Self {
        Self {
            id: format!("chatcmpl-{}", Uuid::new_v4()),
            created: now_secs(),
        }
    }
}

impl Default for ResponseIdentity {
    fn default() -> Self {
        Self::new()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
