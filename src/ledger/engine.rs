//! Atomic ledger operations over accounts and the transaction log.
//!
//! Every public operation here opens one database transaction: the balance
//! mutation and its ledger entry commit together or not at all. Scopes never
//! hold external I/O, and nothing in this module retries — a conflict or
//! failure aborts the whole scope and surfaces to the caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::db::{accounts, transactions, Database};
use crate::error::{Error, Result};
use crate::models::{AccountType, Transaction, TransactionKind, TransactionStatus};

/// The engine behind every balance-mutating endpoint.
#[derive(Clone)]
pub struct LedgerEngine {
    db: Database,
}

/// A service purchase. Each variant is its own fully-specified transition;
/// there is no shared mutation path with per-case exceptions.
#[derive(Debug, Clone)]
pub enum ServiceOrder {
    /// Buy a capability tier; the price leaves the wallet.
    AccountUpgrade { plan: AccountType, price: Decimal },

    /// Buy a signal package; the price leaves the wallet.
    SignalPurchase { signal_type: String, price: Decimal },

    /// Earmark wallet funds for copy trading (wallet → trading).
    TradingFund { amount: Decimal },

    /// Release trading funds back to the wallet (trading → wallet).
    TradingSell { amount: Decimal },
}

impl ServiceOrder {
    pub fn kind(&self) -> TransactionKind {
        match self {
            ServiceOrder::AccountUpgrade { .. } => TransactionKind::AccountUpgrade,
            ServiceOrder::SignalPurchase { .. } => TransactionKind::SignalPurchase,
            ServiceOrder::TradingFund { .. } => TransactionKind::TradingFund,
            ServiceOrder::TradingSell { .. } => TransactionKind::TradingSell,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            ServiceOrder::AccountUpgrade { price, .. } => *price,
            ServiceOrder::SignalPurchase { price, .. } => *price,
            ServiceOrder::TradingFund { amount } => *amount,
            ServiceOrder::TradingSell { amount } => *amount,
        }
    }
}

/// What a purchase-style operation hands back to the caller.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub transaction: Transaction,
    pub wallet_balance: Decimal,
    pub trading_balance: Decimal,
}

impl LedgerEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Announce an external deposit. Creates a `pending` entry carrying the
    /// proof-of-payment reference; the wallet is only credited when an admin
    /// confirms the entry.
    pub async fn deposit(
        &self,
        account_id: &str,
        amount: Decimal,
        method: &str,
        reference_id: Option<String>,
        proof_image: &str,
    ) -> Result<Transaction> {
        require_positive(amount, "deposit")?;
        if proof_image.trim().is_empty() {
            return Err(Error::Validation("no proof of payment uploaded".to_string()));
        }

        let mut tx = self.db.begin().await?;

        accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let mut entry = new_entry(account_id, TransactionKind::Deposit, amount);
        entry.method = Some(method.to_string());
        entry.reference_id = reference_id;
        entry.proof_image = Some(proof_image.to_string());
        entry.description = Some(format!("Deposit via {method}"));
        transactions::insert_entry(&mut tx, &entry).await?;

        tx.commit().await?;
        info!(account = %account_id, amount = %amount, method, "deposit announced");
        Ok(entry)
    }

    /// Request a withdrawal. Funds are locked immediately: the wallet is
    /// debited at request time, before any admin review, so the balance can
    /// not be spent twice while the request is pending.
    pub async fn request_withdrawal(
        &self,
        account_id: &str,
        amount: Decimal,
        method: &str,
        payout_address: &str,
    ) -> Result<Transaction> {
        require_positive(amount, "withdrawal")?;
        if payout_address.trim().is_empty() {
            return Err(Error::Validation("payout destination is required".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let wallet = debit(row.wallet_balance()?, amount, "insufficient wallet balance")?;

        let mut entry = new_entry(account_id, TransactionKind::Withdrawal, amount);
        entry.method = Some(method.to_string());
        entry.reference_id = Some(withdrawal_reference());
        entry.description = Some(format!("Withdrawal request to {payout_address}"));
        transactions::insert_entry(&mut tx, &entry).await?;

        accounts::store_balances(
            &mut tx,
            account_id,
            wallet,
            row.trading_balance()?,
            row.total_profits()?,
        )
        .await?;

        tx.commit().await?;
        info!(
            account = %account_id,
            amount = %amount,
            reference = entry.reference_id.as_deref().unwrap_or(""),
            "withdrawal requested, funds locked"
        );
        Ok(entry)
    }

    /// Buy a plan or signal service. Irreversible at creation: the entry is
    /// written `completed`, there is no pending phase.
    pub async fn purchase(
        &self,
        account_id: &str,
        amount: Decimal,
        plan_name: Option<String>,
        signal_type: Option<String>,
        description: Option<String>,
    ) -> Result<PurchaseOutcome> {
        require_positive(amount, "purchase")?;

        let mut tx = self.db.begin().await?;

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let wallet = debit(row.wallet_balance()?, amount, "insufficient wallet balance")?;
        let trading = row.trading_balance()?;

        let mut entry = new_entry(account_id, TransactionKind::Purchase, amount);
        entry.status = TransactionStatus::Completed;
        entry.plan_name = plan_name;
        entry.signal_type = signal_type;
        entry.description = description;
        transactions::insert_entry(&mut tx, &entry).await?;

        accounts::store_balances(&mut tx, account_id, wallet, trading, row.total_profits()?)
            .await?;

        tx.commit().await?;
        info!(account = %account_id, amount = %amount, "purchase completed");
        Ok(PurchaseOutcome {
            transaction: entry,
            wallet_balance: wallet,
            trading_balance: trading,
        })
    }

    /// Execute a discriminated service order. Each variant applies its own
    /// transition; all of them write one `completed` entry tagged with the
    /// variant's kind.
    pub async fn service_purchase(
        &self,
        account_id: &str,
        order: ServiceOrder,
        description: Option<String>,
    ) -> Result<PurchaseOutcome> {
        let amount = order.amount();
        require_positive(amount, "purchase")?;

        let mut tx = self.db.begin().await?;

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let mut wallet = row.wallet_balance()?;
        let mut trading = row.trading_balance()?;

        let mut entry = new_entry(account_id, order.kind(), amount);
        entry.status = TransactionStatus::Completed;
        entry.description = description;

        match order {
            ServiceOrder::AccountUpgrade { plan, price } => {
                wallet = debit(wallet, price, "insufficient wallet balance")?;
                accounts::set_account_type(&mut tx, account_id, plan).await?;
                entry.plan_name = Some(plan.as_str().to_string());
            }
            ServiceOrder::SignalPurchase { signal_type, price } => {
                wallet = debit(wallet, price, "insufficient wallet balance")?;
                entry.signal_type = Some(signal_type);
            }
            ServiceOrder::TradingFund { amount } => {
                wallet = debit(wallet, amount, "insufficient wallet balance")?;
                trading += amount;
            }
            ServiceOrder::TradingSell { amount } => {
                trading = debit(trading, amount, "insufficient trading balance")?;
                wallet += amount;
            }
        }

        transactions::insert_entry(&mut tx, &entry).await?;
        accounts::store_balances(&mut tx, account_id, wallet, trading, row.total_profits()?)
            .await?;

        tx.commit().await?;
        info!(
            account = %account_id,
            kind = entry.kind.as_str(),
            amount = %amount,
            "service purchase completed"
        );
        Ok(PurchaseOutcome {
            transaction: entry,
            wallet_balance: wallet,
            trading_balance: trading,
        })
    }

    /// Trusted-operator bypass of the pending → review flow: write a
    /// `completed` entry directly (optionally backdated) and credit the
    /// wallet. Profit-like kinds also bump the cumulative profit counter.
    /// Used to reconcile off-system events such as confirmed bank wires.
    pub async fn inject_entry(
        &self,
        account_id: &str,
        amount: Decimal,
        kind: TransactionKind,
        method: Option<String>,
        backdated_at: Option<DateTime<Utc>>,
    ) -> Result<Transaction> {
        require_positive(amount, "ledger injection")?;

        let mut tx = self.db.begin().await?;

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let wallet = row.wallet_balance()? + amount;
        let mut profits = row.total_profits()?;
        if kind.counts_toward_profits() {
            profits += amount;
        }

        let mut entry = new_entry(account_id, kind, amount);
        entry.status = TransactionStatus::Completed;
        entry.method = method;
        if kind.counts_toward_profits() {
            entry.description = Some(format!("+{amount} Profit"));
        }
        if let Some(ts) = backdated_at {
            entry.created_at = ts;
        }
        transactions::insert_entry(&mut tx, &entry).await?;

        accounts::store_balances(&mut tx, account_id, wallet, row.trading_balance()?, profits)
            .await?;

        tx.commit().await?;
        info!(
            account = %account_id,
            kind = entry.kind.as_str(),
            amount = %amount,
            "ledger entry injected"
        );
        Ok(entry)
    }

    /// Move a pending entry to a terminal status. Terminal entries reject
    /// any further transition. Confirming a deposit is the moment its funds
    /// land in the wallet; every other transition is balance-neutral
    /// (withdrawals were already debited at request time).
    pub async fn transition_status(
        &self,
        transaction_id: &str,
        new_status: TransactionStatus,
    ) -> Result<Transaction> {
        if !new_status.is_terminal() {
            return Err(Error::Validation(
                "status must be completed or failed".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let row = transactions::fetch_entry_row(&mut tx, transaction_id)
            .await?
            .ok_or(Error::NotFound("transaction"))?;

        if row.status()?.is_terminal() {
            return Err(Error::AlreadyProcessed);
        }

        if row.kind()? == TransactionKind::Deposit && new_status == TransactionStatus::Completed {
            let account = accounts::fetch_account_row(&mut tx, &row.account_id)
                .await?
                .ok_or(Error::NotFound("account"))?;
            let wallet = account.wallet_balance()? + row.amount()?;
            accounts::store_balances(
                &mut tx,
                &row.account_id,
                wallet,
                account.trading_balance()?,
                account.total_profits()?,
            )
            .await?;
        }

        transactions::set_status(&mut tx, transaction_id, new_status).await?;

        tx.commit().await?;
        info!(
            transaction = %transaction_id,
            status = new_status.as_str(),
            "transaction status updated"
        );

        self.db
            .get_transaction(transaction_id)
            .await?
            .ok_or(Error::NotFound("transaction"))
    }

    /// Credit a profit allocation: wallet and cumulative profits move
    /// together with one `completed` entry.
    pub async fn topup_profit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        require_positive(amount, "profit")?;

        let mut tx = self.db.begin().await?;

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let wallet = row.wallet_balance()? + amount;
        let profits = row.total_profits()? + amount;

        let mut entry = new_entry(account_id, TransactionKind::Profit, amount);
        entry.status = TransactionStatus::Completed;
        entry.description =
            Some(description.unwrap_or_else(|| "System Profit Allocation".to_string()));
        transactions::insert_entry(&mut tx, &entry).await?;

        accounts::store_balances(&mut tx, account_id, wallet, row.trading_balance()?, profits)
            .await?;

        tx.commit().await?;
        info!(account = %account_id, amount = %amount, "profit injected");
        Ok(entry)
    }

    pub(super) fn db(&self) -> &Database {
        &self.db
    }
}

/// Fresh pending entry with nothing but the required fields set.
fn new_entry(account_id: &str, kind: TransactionKind, amount: Decimal) -> Transaction {
    Transaction {
        id: Uuid::new_v4().to_string(),
        account_id: account_id.to_string(),
        kind,
        amount,
        status: TransactionStatus::Pending,
        method: None,
        reference_id: None,
        description: None,
        proof_image: None,
        plan_name: None,
        signal_type: None,
        staking_duration: None,
        created_at: Utc::now(),
    }
}

/// Correlation token handed to the caller for off-system settlement.
fn withdrawal_reference() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("WD-{}", token[..8].to_uppercase())
}

/// Balance guard: reject any mutation that would go below zero.
pub(super) fn debit(
    balance: Decimal,
    amount: Decimal,
    insufficient: &'static str,
) -> Result<Decimal> {
    let next = balance - amount;
    if next < Decimal::ZERO {
        return Err(Error::InsufficientFunds(insufficient));
    }
    Ok(next)
}

pub(super) fn require_positive(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!("{what} amount must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AccountPatch, NewAccount};
    use crate::models::Role;
    use rust_decimal_macros::dec;

    async fn fresh() -> (Database, LedgerEngine) {
        let db = Database::new("sqlite::memory:").await.unwrap();
        (db.clone(), LedgerEngine::new(db))
    }

    async fn funded_account(db: &Database, wallet: Decimal, trading: Decimal) -> String {
        let account = db
            .insert_account(NewAccount {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("user-{}@example.com", Uuid::new_v4()),
                password_hash: "$2b$10$hash".to_string(),
                currency: "USD".to_string(),
                role: Role::User,
            })
            .await
            .unwrap();
        db.admin_update_account(
            &account.id,
            AccountPatch {
                wallet_balance: Some(wallet),
                trading_balance: Some(trading),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        account.id
    }

    #[tokio::test]
    async fn deposit_is_pending_and_leaves_wallet_untouched() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(10), dec!(0)).await;

        let entry = engine
            .deposit(&id, dec!(500), "bank_transfer", None, "https://cdn/proof.png")
            .await
            .unwrap();

        assert_eq!(entry.status, TransactionStatus::Pending);
        assert_eq!(entry.kind, TransactionKind::Deposit);
        assert_eq!(entry.proof_image.as_deref(), Some("https://cdn/proof.png"));

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(10));
    }

    #[tokio::test]
    async fn deposit_requires_proof_and_positive_amount() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(0), dec!(0)).await;

        let missing_proof = engine.deposit(&id, dec!(100), "card", None, "  ").await;
        assert!(matches!(missing_proof, Err(Error::Validation(_))));

        let non_positive = engine.deposit(&id, dec!(0), "card", None, "proof").await;
        assert!(matches!(non_positive, Err(Error::Validation(_))));

        assert!(db.list_transactions_for(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn withdrawal_locks_funds_at_request_time() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(100), dec!(0)).await;

        let entry = engine
            .request_withdrawal(&id, dec!(40), "bank_transfer", "DE89 3704 0044 0532 0130 00")
            .await
            .unwrap();

        assert_eq!(entry.kind, TransactionKind::Withdrawal);
        assert_eq!(entry.status, TransactionStatus::Pending);
        assert_eq!(entry.amount, dec!(40));
        assert!(entry.reference_id.as_deref().unwrap().starts_with("WD-"));

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(60));
    }

    #[tokio::test]
    async fn withdrawal_rejects_insufficient_balance() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(30), dec!(0)).await;

        let err = engine
            .request_withdrawal(&id, dec!(40), "bank_transfer", "acct-9")
            .await;
        assert!(matches!(err, Err(Error::InsufficientFunds(_))));

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(30));
        assert!(db.list_transactions_for(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirming_a_withdrawal_is_balance_neutral() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(100), dec!(0)).await;

        let entry = engine
            .request_withdrawal(&id, dec!(40), "bank_transfer", "acct-9")
            .await
            .unwrap();

        // Straight pending → completed, no intervening step.
        let updated = engine
            .transition_status(&entry.id, TransactionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, TransactionStatus::Completed);

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(60));
    }

    #[tokio::test]
    async fn confirming_a_deposit_credits_the_wallet() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(5), dec!(0)).await;

        let entry = engine
            .deposit(&id, dec!(40), "bank_transfer", None, "proof.png")
            .await
            .unwrap();
        engine
            .transition_status(&entry.id, TransactionStatus::Completed)
            .await
            .unwrap();

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(45));
    }

    #[tokio::test]
    async fn terminal_entries_reject_further_transitions() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(5), dec!(0)).await;

        let entry = engine
            .deposit(&id, dec!(40), "bank_transfer", None, "proof.png")
            .await
            .unwrap();
        engine
            .transition_status(&entry.id, TransactionStatus::Completed)
            .await
            .unwrap();

        let err = engine
            .transition_status(&entry.id, TransactionStatus::Failed)
            .await;
        assert!(matches!(err, Err(Error::AlreadyProcessed)));

        // The rejected call must not have mutated anything.
        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(45));
        let stored = db.get_transaction(&entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn profit_injection_updates_both_counters() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(60), dec!(0)).await;

        let entry = engine
            .inject_entry(&id, dec!(25), TransactionKind::Profit, None, None)
            .await
            .unwrap();
        assert_eq!(entry.status, TransactionStatus::Completed);

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(85));
        assert_eq!(account.total_profits, dec!(25));
    }

    #[tokio::test]
    async fn deposit_injection_skips_the_profit_counter() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(0), dec!(0)).await;

        let backdate = "2025-11-02T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let entry = engine
            .inject_entry(
                &id,
                dec!(1000),
                TransactionKind::Deposit,
                Some("wire".to_string()),
                Some(backdate),
            )
            .await
            .unwrap();
        assert_eq!(entry.created_at, backdate);

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(1000));
        assert_eq!(account.total_profits, dec!(0));
    }

    #[tokio::test]
    async fn topup_profit_credits_wallet_and_counter() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(10), dec!(0)).await;

        let entry = engine.topup_profit(&id, dec!(15), None).await.unwrap();
        assert_eq!(entry.kind, TransactionKind::Profit);
        assert_eq!(
            entry.description.as_deref(),
            Some("System Profit Allocation")
        );

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(25));
        assert_eq!(account.total_profits, dec!(15));
    }

    #[tokio::test]
    async fn purchase_completes_immediately() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(200), dec!(0)).await;

        let outcome = engine
            .purchase(
                &id,
                dec!(50),
                Some("gold".to_string()),
                None,
                Some("Gold plan".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(outcome.transaction.status, TransactionStatus::Completed);
        assert_eq!(outcome.wallet_balance, dec!(150));

        let err = engine.purchase(&id, dec!(500), None, None, None).await;
        assert!(matches!(err, Err(Error::InsufficientFunds(_))));
    }

    #[tokio::test]
    async fn trading_fund_moves_wallet_to_trading() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(100), dec!(0)).await;

        let outcome = engine
            .service_purchase(&id, ServiceOrder::TradingFund { amount: dec!(30) }, None)
            .await
            .unwrap();

        assert_eq!(outcome.wallet_balance, dec!(70));
        assert_eq!(outcome.trading_balance, dec!(30));
        assert_eq!(outcome.transaction.kind, TransactionKind::TradingFund);
    }

    #[tokio::test]
    async fn trading_sell_releases_funds_without_a_wallet_debit() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(100), dec!(50)).await;

        let outcome = engine
            .service_purchase(&id, ServiceOrder::TradingSell { amount: dec!(20) }, None)
            .await
            .unwrap();

        // Wallet gains the full amount; only the trading balance is charged.
        assert_eq!(outcome.wallet_balance, dec!(120));
        assert_eq!(outcome.trading_balance, dec!(30));

        let err = engine
            .service_purchase(&id, ServiceOrder::TradingSell { amount: dec!(999) }, None)
            .await;
        assert!(matches!(err, Err(Error::InsufficientFunds(_))));
    }

    #[tokio::test]
    async fn account_upgrade_sets_tier_and_charges_wallet() {
        let (db, engine) = fresh().await;
        let id = funded_account(&db, dec!(100), dec!(0)).await;

        let outcome = engine
            .service_purchase(
                &id,
                ServiceOrder::AccountUpgrade {
                    plan: AccountType::Gold,
                    price: dec!(80),
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(outcome.wallet_balance, dec!(20));
        assert_eq!(outcome.transaction.plan_name.as_deref(), Some("gold"));

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.account_type, AccountType::Gold);
    }

    #[tokio::test]
    async fn aborted_scope_leaves_no_trace() {
        let (db, _engine) = fresh().await;
        let id = funded_account(&db, dec!(100), dec!(0)).await;

        // Simulate a failure between the two writes of an operation: debit
        // the wallet and append an entry, then drop the scope uncommitted.
        {
            let mut tx = db.begin().await.unwrap();
            let row = crate::db::accounts::fetch_account_row(&mut tx, &id)
                .await
                .unwrap()
                .unwrap();
            let wallet = debit(row.wallet_balance().unwrap(), dec!(40), "insufficient").unwrap();
            crate::db::accounts::store_balances(&mut tx, &id, wallet, dec!(0), dec!(0))
                .await
                .unwrap();
            let entry = new_entry(&id, TransactionKind::Withdrawal, dec!(40));
            crate::db::transactions::insert_entry(&mut tx, &entry)
                .await
                .unwrap();
            // tx dropped here without commit
        }

        let account = db.get_account(&id).await.unwrap().unwrap();
        assert_eq!(account.wallet_balance, dec!(100));
        assert!(db.list_transactions_for(&id).await.unwrap().is_empty());
    }
}
