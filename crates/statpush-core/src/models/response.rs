//! Raw platform response captured after a send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status and body exactly as returned by the platform.
///
/// The core never interprets the status; callers inspect it themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
    /// When the response was received
    pub received_at: DateTime<Utc>,
}

impl PlatformResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
