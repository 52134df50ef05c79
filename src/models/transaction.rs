//! Ledger transaction model: one immutable record per monetary event.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::UnknownVariant;

/// What kind of monetary event a ledger entry records. The amount is always
/// stored as a positive magnitude; the kind implies the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Purchase,
    AccountUpgrade,
    TradingFund,
    TradingSell,
    TradingYield,
    Profit,
    SignalPurchase,
    StakingDeposit,
    StakingReward,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Purchase => "purchase",
            TransactionKind::AccountUpgrade => "account_upgrade",
            TransactionKind::TradingFund => "trading_fund",
            TransactionKind::TradingSell => "trading_sell",
            TransactionKind::TradingYield => "trading_yield",
            TransactionKind::Profit => "profit",
            TransactionKind::SignalPurchase => "signal_purchase",
            TransactionKind::StakingDeposit => "staking_deposit",
            TransactionKind::StakingReward => "staking_reward",
        }
    }

    /// Kinds that also bump the account's cumulative profit counter when
    /// injected by an admin.
    pub fn counts_toward_profits(&self) -> bool {
        matches!(self, TransactionKind::Profit | TransactionKind::TradingYield)
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            "purchase" => Ok(TransactionKind::Purchase),
            "account_upgrade" => Ok(TransactionKind::AccountUpgrade),
            "trading_fund" => Ok(TransactionKind::TradingFund),
            "trading_sell" => Ok(TransactionKind::TradingSell),
            "trading_yield" => Ok(TransactionKind::TradingYield),
            "profit" => Ok(TransactionKind::Profit),
            "signal_purchase" => Ok(TransactionKind::SignalPurchase),
            "staking_deposit" => Ok(TransactionKind::StakingDeposit),
            "staking_reward" => Ok(TransactionKind::StakingReward),
            other => Err(UnknownVariant("transaction kind", other.to_string())),
        }
    }
}

/// Review status of a ledger entry. `Completed` and `Failed` are terminal:
/// once reached, the entry never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(UnknownVariant("transaction status", other.to_string())),
        }
    }
}

/// One ledger entry. Created atomically with the balance mutation it records;
/// never updated afterwards except for the pending → terminal status flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    pub account_id: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Positive magnitude; direction implied by `kind`
    pub amount: Decimal,

    pub status: TransactionStatus,

    /// Payment rail for deposits/withdrawals, e.g. "bank_transfer"
    pub method: Option<String>,

    /// External correlation token, e.g. "WD-9F3A21BC"
    pub reference_id: Option<String>,

    pub description: Option<String>,

    /// URL of the uploaded proof-of-payment artifact (deposits only)
    pub proof_image: Option<String>,

    // Advisory detail payload; never used for balance math.
    pub plan_name: Option<String>,
    pub signal_type: Option<String>,
    pub staking_duration: Option<i64>,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn kind_parse_round_trip() {
        assert_eq!(
            "trading_sell".parse::<TransactionKind>().unwrap(),
            TransactionKind::TradingSell
        );
        assert_eq!(TransactionKind::AccountUpgrade.as_str(), "account_upgrade");
        assert!("margin_call".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn profit_kinds_bump_the_counter() {
        assert!(TransactionKind::Profit.counts_toward_profits());
        assert!(TransactionKind::TradingYield.counts_toward_profits());
        assert!(!TransactionKind::Deposit.counts_toward_profits());
    }
}
