//! Domain models for accounts, traders, ledger transactions, and chat.

mod account;
mod chat;
mod trader;
mod transaction;

pub use account::{Account, AccountType, CopiedTrader, Role};
pub use chat::{ChatMessage, DeliveryStatus};
pub use trader::Trader;
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
