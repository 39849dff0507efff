//! Push notification delivery token registration.

use serde::{Deserialize, Serialize};

/// Stored delivery token (`pushTokens/{token}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushToken {
    /// Device delivery token (also used as document ID)
    pub token: String,
    #[serde(rename = "userEmail")]
    pub owner: String,
    /// Last registration time (ISO 8601)
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}
