//! The ledger operations engine: atomic, multi-entity state transitions
//! over accounts, traders, and the transaction log.

mod copy;
mod engine;

pub use copy::CopyOutcome;
pub use engine::{LedgerEngine, PurchaseOutcome, ServiceOrder};
