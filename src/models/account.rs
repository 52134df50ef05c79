//! Account model: identity, balances, and copy-trading allocations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Capability tier, changed by purchasing an account upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Basic,
    Standard,
    Silver,
    Gold,
    Demo,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Basic => "basic",
            AccountType::Standard => "standard",
            AccountType::Silver => "silver",
            AccountType::Gold => "gold",
            AccountType::Demo => "demo",
        }
    }
}

impl FromStr for AccountType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(AccountType::Basic),
            "standard" => Ok(AccountType::Standard),
            "silver" => Ok(AccountType::Silver),
            "gold" => Ok(AccountType::Gold),
            "demo" => Ok(AccountType::Demo),
            other => Err(UnknownVariant("account type", other.to_string())),
        }
    }
}

/// Privilege level attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownVariant("role", other.to_string())),
        }
    }
}

/// Returned when a stored enum value does not match any known variant.
#[derive(Debug)]
pub struct UnknownVariant(pub &'static str, pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.0, self.1)
    }
}

impl std::error::Error for UnknownVariant {}

/// One active copy-trading allocation: funds locked against a trader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopiedTrader {
    /// Trader being mirrored
    pub trader_id: String,

    /// Amount of trading balance locked into this allocation
    pub amount_allocated: Decimal,
}

/// A user account with its monetary state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,

    pub first_name: String,
    pub last_name: String,

    /// Unique, stored lowercase
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display currency code, e.g. "USD"
    pub currency: String,

    /// Liquid funds available for withdrawal and purchases
    pub wallet_balance: Decimal,

    /// Funds earmarked for copy trading
    pub trading_balance: Decimal,

    /// Cumulative profit counter, informational
    pub total_profits: Decimal,

    pub account_type: AccountType,
    pub role: Role,
    pub is_active: bool,

    /// Active copy-trading allocations, at most one per trader
    pub copied_traders: Vec<CopiedTrader>,

    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Full display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn account_type_round_trip() {
        assert_eq!("gold".parse::<AccountType>().unwrap(), AccountType::Gold);
        assert!("platinum".parse::<AccountType>().is_err());
    }
}
