//! Copy-trading lifecycle: allocation locking and the follower counter.
//!
//! Starting a copy locks part of the trading balance into an allocation and
//! bumps the trader's follower count; stopping releases the allocation back
//! to the trading balance (the refund policy this codebase commits to) and
//! releases the follower. Both directions are single atomic scopes.

use rust_decimal::Decimal;
use tracing::info;

use crate::db::{accounts, traders};
use crate::error::{Error, Result};
use crate::models::CopiedTrader;

use super::engine::{debit, require_positive, LedgerEngine};

/// Balances and allocations as they stand after a copy operation.
#[derive(Debug, Clone)]
pub struct CopyOutcome {
    pub trading_balance: Decimal,
    pub copied_traders: Vec<CopiedTrader>,
}

impl LedgerEngine {
    /// Start mirroring a trader, locking `amount` of trading balance into
    /// the allocation. At most one allocation per (account, trader) pair.
    pub async fn start_copying(
        &self,
        account_id: &str,
        trader_id: &str,
        amount: Decimal,
    ) -> Result<CopyOutcome> {
        require_positive(amount, "allocation")?;

        let mut tx = self.db().begin().await?;

        let trader = traders::fetch_trader_row(&mut tx, trader_id)
            .await?
            .ok_or(Error::NotFound("trader"))?;
        if !trader.is_public {
            return Err(Error::NotFound("trader"));
        }

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        if accounts::fetch_allocation(&mut tx, account_id, trader_id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyFollowing);
        }

        let trading = debit(
            row.trading_balance()?,
            amount,
            "insufficient trading balance",
        )?;

        accounts::insert_allocation(&mut tx, account_id, trader_id, amount).await?;
        accounts::store_balances(
            &mut tx,
            account_id,
            row.wallet_balance()?,
            trading,
            row.total_profits()?,
        )
        .await?;
        traders::adjust_followers(&mut tx, trader_id, 1).await?;

        let copied_traders = accounts::list_allocations(&mut tx, account_id).await?;

        tx.commit().await?;
        info!(
            account = %account_id,
            trader = %trader_id,
            amount = %amount,
            "copy started"
        );
        Ok(CopyOutcome {
            trading_balance: trading,
            copied_traders,
        })
    }

    /// Stop mirroring a trader: the allocation is removed and its amount
    /// refunded to the trading balance. Tolerates a trader that has been
    /// removed since the copy started — the funds must always come back.
    pub async fn stop_copying(&self, account_id: &str, trader_id: &str) -> Result<CopyOutcome> {
        let mut tx = self.db().begin().await?;

        let row = accounts::fetch_account_row(&mut tx, account_id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let allocated = accounts::fetch_allocation(&mut tx, account_id, trader_id)
            .await?
            .ok_or(Error::NotFound("allocation"))?;

        let trading = row.trading_balance()? + allocated;

        accounts::delete_allocation(&mut tx, account_id, trader_id).await?;
        accounts::store_balances(
            &mut tx,
            account_id,
            row.wallet_balance()?,
            trading,
            row.total_profits()?,
        )
        .await?;
        traders::adjust_followers(&mut tx, trader_id, -1).await?;

        let copied_traders = accounts::list_allocations(&mut tx, account_id).await?;

        tx.commit().await?;
        info!(
            account = %account_id,
            trader = %trader_id,
            refunded = %allocated,
            "copy stopped"
        );
        Ok(CopyOutcome {
            trading_balance: trading,
            copied_traders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AccountPatch, Database, NewAccount, NewTrader, TraderPatch};
    use crate::models::Role;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    async fn fresh() -> (Database, LedgerEngine) {
        let db = Database::new("sqlite::memory:").await.unwrap();
        (db.clone(), LedgerEngine::new(db))
    }

    async fn trading_account(db: &Database, trading: Decimal) -> String {
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
                trading_balance: Some(trading),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        account.id
    }

    async fn public_trader(db: &Database, name: &str) -> String {
        db.insert_trader(NewTrader {
            name: name.to_string(),
            avatar: "TX".to_string(),
            strategy: "Swing".to_string(),
            roi: "+80.1%".to_string(),
            win_rate: "74%".to_string(),
            max_drawdown: "-6.0%".to_string(),
            is_public: true,
            is_trending: false,
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn start_locks_allocation_and_counts_the_follower() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(200)).await;
        let trader_id = public_trader(&db, "Trader X").await;

        let outcome = engine
            .start_copying(&account_id, &trader_id, dec!(50))
            .await
            .unwrap();

        assert_eq!(outcome.trading_balance, dec!(150));
        assert_eq!(outcome.copied_traders.len(), 1);
        assert_eq!(outcome.copied_traders[0].trader_id, trader_id);
        assert_eq!(outcome.copied_traders[0].amount_allocated, dec!(50));

        let trader = db.get_trader(&trader_id).await.unwrap().unwrap();
        assert_eq!(trader.followers, 1);
    }

    #[tokio::test]
    async fn duplicate_copy_is_rejected_without_side_effects() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(200)).await;
        let trader_id = public_trader(&db, "Trader X").await;

        engine
            .start_copying(&account_id, &trader_id, dec!(50))
            .await
            .unwrap();
        let err = engine.start_copying(&account_id, &trader_id, dec!(10)).await;
        assert!(matches!(err, Err(Error::AlreadyFollowing)));

        // Everything still reflects only the first call.
        let account = db.get_account(&account_id).await.unwrap().unwrap();
        assert_eq!(account.trading_balance, dec!(150));
        assert_eq!(account.copied_traders.len(), 1);
        let trader = db.get_trader(&trader_id).await.unwrap().unwrap();
        assert_eq!(trader.followers, 1);
    }

    #[tokio::test]
    async fn start_requires_trading_cover() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(20)).await;
        let trader_id = public_trader(&db, "Trader X").await;

        let err = engine.start_copying(&account_id, &trader_id, dec!(50)).await;
        assert!(matches!(err, Err(Error::InsufficientFunds(_))));

        let trader = db.get_trader(&trader_id).await.unwrap().unwrap();
        assert_eq!(trader.followers, 0);
        let account = db.get_account(&account_id).await.unwrap().unwrap();
        assert!(account.copied_traders.is_empty());
    }

    #[tokio::test]
    async fn hidden_traders_cannot_be_copied() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(200)).await;
        let trader_id = public_trader(&db, "Ghost").await;
        db.update_trader(
            &trader_id,
            TraderPatch {
                is_public: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = engine.start_copying(&account_id, &trader_id, dec!(50)).await;
        assert!(matches!(err, Err(Error::NotFound("trader"))));
    }

    #[tokio::test]
    async fn stop_refunds_allocation_to_trading_balance() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(200)).await;
        let trader_id = public_trader(&db, "Trader X").await;

        engine
            .start_copying(&account_id, &trader_id, dec!(50))
            .await
            .unwrap();
        let outcome = engine.stop_copying(&account_id, &trader_id).await.unwrap();

        // Refund policy: stop restores the balance from before the start.
        assert_eq!(outcome.trading_balance, dec!(200));
        assert!(outcome.copied_traders.is_empty());

        let trader = db.get_trader(&trader_id).await.unwrap().unwrap();
        assert_eq!(trader.followers, 0);
    }

    #[tokio::test]
    async fn stop_without_an_allocation_is_rejected() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(200)).await;
        let trader_id = public_trader(&db, "Trader X").await;

        let err = engine.stop_copying(&account_id, &trader_id).await;
        assert!(matches!(err, Err(Error::NotFound("allocation"))));
    }

    #[tokio::test]
    async fn stop_still_refunds_after_the_trader_is_removed() {
        let (db, engine) = fresh().await;
        let account_id = trading_account(&db, dec!(200)).await;
        let trader_id = public_trader(&db, "Short Lived").await;

        engine
            .start_copying(&account_id, &trader_id, dec!(80))
            .await
            .unwrap();
        // Referenced traders are hidden rather than deleted.
        db.remove_trader(&trader_id).await.unwrap();

        let outcome = engine.stop_copying(&account_id, &trader_id).await.unwrap();
        assert_eq!(outcome.trading_balance, dec!(200));
    }
}
