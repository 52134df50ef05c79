//! Trader model: a public strategist profile users can mirror.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Strategist profile shown on the discovery grid.
///
/// Performance figures are admin-authored display strings ("+124.5%"), not
/// inputs to any balance math. The only field the ledger maintains is
/// `followers`, which always equals the number of accounts holding an
/// allocation against this trader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trader {
    pub id: String,

    pub name: String,

    /// Initials or an image URL
    pub avatar: String,

    /// Strategy label, e.g. "Scalping"
    pub strategy: String,

    pub roi: String,
    pub win_rate: String,
    pub max_drawdown: String,

    /// Count of accounts currently mirroring this trader
    pub followers: i64,

    /// Whether the profile appears in public discovery listings
    pub is_public: bool,

    pub is_trending: bool,

    pub created_at: DateTime<Utc>,
}

impl Trader {
    /// Short display handle for logs.
    pub fn display_name(&self) -> &str {
        &self.name
    }
}
