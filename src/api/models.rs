//! Request and response bodies for the JSON API.
//!
//! Wire naming is camelCase to match the frontend. Amounts deserialize
//! through `Decimal`, which accepts JSON numbers and numeric strings alike;
//! everything is a real number by the time it reaches the ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Account, AccountType, CopiedTrader, Role, Transaction, TransactionKind, TransactionStatus,
};

// ---- auth ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub currency: String,
    pub account_type: AccountType,
    pub wallet_balance: Decimal,
    pub token: String,
}

// ---- accounts ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub wallet_balance: Option<Decimal>,
    pub trading_balance: Option<Decimal>,
    pub total_profits: Option<Decimal>,
    pub account_type: Option<AccountType>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: Account,
}

// ---- traders ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTraderRequest {
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub strategy: Option<String>,
    pub roi: String,
    pub win_rate: String,
    #[serde(default)]
    pub max_drawdown: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub is_trending: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTraderRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub strategy: Option<String>,
    pub roi: Option<String>,
    pub win_rate: Option<String>,
    pub max_drawdown: Option<String>,
    pub is_public: Option<bool>,
    pub is_trending: Option<bool>,
}

// ---- copy trading ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyStartRequest {
    pub trader_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyStopRequest {
    pub trader_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyResponse {
    pub message: String,
    pub trading_balance: Decimal,
    pub copied_traders: Vec<CopiedTrader>,
}

// ---- ledger ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub amount: Decimal,
    pub method: String,
    #[serde(default)]
    pub reference_id: Option<String>,
    pub proof_image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub amount: Decimal,
    pub method: String,
    pub payout_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub signal_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub message: String,
    pub new_balance: Decimal,
    pub trading_balance: Decimal,
    pub transaction: Transaction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub plan_name: Option<String>,
    pub signal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePurchaseRequest {
    /// Discriminator: account_upgrade, signal_purchase, trading_fund,
    /// trading_sell
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    #[serde(default)]
    pub details: ServiceDetails,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub transaction_id: String,
    pub status: TransactionStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectRequest {
    pub account_id: String,
    pub amount: Decimal,
    /// Defaults to `deposit`
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub method: Option<String>,
    /// Backdated entry timestamp
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitTopupRequest {
    pub account_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfitTopupResponse {
    pub message: String,
    pub transaction: Transaction,
}

// ---- chat & contact ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    /// Defaults to the sender's own room; only admins may address others
    #[serde(default)]
    pub room: Option<String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

// ---- shared ----

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
