//! Support-chat message model. The realtime transport lives outside this
//! service; we only store and serve history.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(DeliveryStatus::Sent),
            "delivered" => Ok(DeliveryStatus::Delivered),
            other => Err(UnknownVariant("delivery status", other.to_string())),
        }
    }
}

/// One chat message in a user's support room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,

    /// Room key; by convention the account id of the user being helped
    pub room: String,

    pub sender_id: String,

    pub body: String,

    /// True when the sender was support staff
    pub is_admin: bool,

    pub status: DeliveryStatus,

    pub created_at: DateTime<Utc>,
}
