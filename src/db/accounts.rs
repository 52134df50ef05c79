//! Account store: identity, balances, and copy-trading allocation edges.

use rust_decimal::Decimal;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Account, AccountType, CopiedTrader, Role};

use super::{now_string, parse_amount, parse_timestamp, Database};

/// Stored account record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub currency: String,
    pub wallet_balance: String,
    pub trading_balance: String,
    pub total_profits: String,
    pub account_type: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
}

/// Stored allocation edge.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AllocationRow {
    pub account_id: String,
    pub trader_id: String,
    pub amount_allocated: String,
}

impl AccountRow {
    pub fn wallet_balance(&self) -> Result<Decimal> {
        parse_amount(&self.wallet_balance, "wallet_balance")
    }

    pub fn trading_balance(&self) -> Result<Decimal> {
        parse_amount(&self.trading_balance, "trading_balance")
    }

    pub fn total_profits(&self) -> Result<Decimal> {
        parse_amount(&self.total_profits, "total_profits")
    }

    pub fn into_account(self, allocations: Vec<AllocationRow>) -> Result<Account> {
        let copied_traders = allocations
            .into_iter()
            .map(|a| {
                Ok(CopiedTrader {
                    amount_allocated: parse_amount(&a.amount_allocated, "amount_allocated")?,
                    trader_id: a.trader_id,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let last_login = match self.last_login {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };

        Ok(Account {
            wallet_balance: parse_amount(&self.wallet_balance, "wallet_balance")?,
            trading_balance: parse_amount(&self.trading_balance, "trading_balance")?,
            total_profits: parse_amount(&self.total_profits, "total_profits")?,
            account_type: self
                .account_type
                .parse::<AccountType>()
                .map_err(|e| Error::Corrupt(e.to_string()))?,
            role: self
                .role
                .parse::<Role>()
                .map_err(|e| Error::Corrupt(e.to_string()))?,
            created_at: parse_timestamp(&self.created_at)?,
            last_login,
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            currency: self.currency,
            is_active: self.is_active,
            copied_traders,
        })
    }
}

/// Fields required to open an account. Balances always start at zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub currency: String,
    pub role: Role,
}

/// Self-service profile update; `None` leaves the field untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub currency: Option<String>,
}

/// Privileged field-level update; `None` leaves the field untouched.
#[derive(Debug, Default, Clone)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub wallet_balance: Option<Decimal>,
    pub trading_balance: Option<Decimal>,
    pub total_profits: Option<Decimal>,
    pub account_type: Option<AccountType>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

impl Database {
    /// Open a new account with zero balances.
    pub async fn insert_account(&self, new: NewAccount) -> Result<Account> {
        let id = Uuid::new_v4().to_string();
        let now = now_string();
        let email = new.email.trim().to_lowercase();

        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, first_name, last_name, email, password_hash, currency,
                role, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&email)
        .bind(&new.password_hash)
        .bind(&new.currency)
        .bind(new.role.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_account(&id).await?.ok_or(Error::NotFound("account"))
    }

    /// Load an account with its allocations.
    pub async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let allocations: Vec<AllocationRow> = sqlx::query_as(
            "SELECT account_id, trader_id, amount_allocated FROM copied_traders WHERE account_id = ? ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_account(allocations).map(Some)
    }

    /// Look up an account by (case-normalized) email.
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let normalized = email.trim().to_lowercase();
        let row: Option<AccountRow> = sqlx::query_as("SELECT * FROM accounts WHERE email = ?")
            .bind(&normalized)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let allocations: Vec<AllocationRow> = sqlx::query_as(
            "SELECT account_id, trader_id, amount_allocated FROM copied_traders WHERE account_id = ? ORDER BY created_at",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        row.into_account(allocations).map(Some)
    }

    /// All accounts, newest first.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows: Vec<AccountRow> =
            sqlx::query_as("SELECT * FROM accounts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        let edges: Vec<AllocationRow> =
            sqlx::query_as("SELECT account_id, trader_id, amount_allocated FROM copied_traders")
                .fetch_all(&self.pool)
                .await?;

        let mut grouped: std::collections::HashMap<String, Vec<AllocationRow>> =
            std::collections::HashMap::new();
        for edge in edges {
            grouped.entry(edge.account_id.clone()).or_default().push(edge);
        }

        rows.into_iter()
            .map(|row| {
                let allocations = grouped.remove(&row.id).unwrap_or_default();
                row.into_account(allocations)
            })
            .collect()
    }

    pub async fn touch_last_login(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE accounts SET last_login = ?, updated_at = ? WHERE id = ?")
            .bind(now_string())
            .bind(now_string())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apply a self-service profile update.
    pub async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<Account> {
        let mut tx = self.begin().await?;

        let row = fetch_account_row(&mut tx, id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let first_name = patch.first_name.unwrap_or(row.first_name);
        let last_name = patch.last_name.unwrap_or(row.last_name);
        let currency = patch.currency.unwrap_or(row.currency);

        sqlx::query(
            "UPDATE accounts SET first_name = ?, last_name = ?, currency = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&currency)
        .bind(now_string())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_account(id).await?.ok_or(Error::NotFound("account"))
    }

    /// Apply a privileged field-level update, balances included.
    pub async fn admin_update_account(&self, id: &str, patch: AccountPatch) -> Result<Account> {
        let mut tx = self.begin().await?;

        let row = fetch_account_row(&mut tx, id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        let wallet = match patch.wallet_balance {
            Some(value) => value,
            None => row.wallet_balance()?,
        };
        let trading = match patch.trading_balance {
            Some(value) => value,
            None => row.trading_balance()?,
        };
        let profits = match patch.total_profits {
            Some(value) => value,
            None => row.total_profits()?,
        };
        if wallet < Decimal::ZERO || trading < Decimal::ZERO {
            return Err(Error::Validation("balances cannot be negative".to_string()));
        }

        let account_type = patch
            .account_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(row.account_type);
        let role = patch.role.map(|r| r.as_str().to_string()).unwrap_or(row.role);
        let email = patch
            .email
            .map(|e| e.trim().to_lowercase())
            .unwrap_or(row.email);

        sqlx::query(
            r#"
            UPDATE accounts SET
                first_name = ?, last_name = ?, email = ?,
                wallet_balance = ?, trading_balance = ?, total_profits = ?,
                account_type = ?, role = ?, is_active = ?,
                password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.first_name.unwrap_or(row.first_name))
        .bind(patch.last_name.unwrap_or(row.last_name))
        .bind(&email)
        .bind(wallet.to_string())
        .bind(trading.to_string())
        .bind(profits.to_string())
        .bind(&account_type)
        .bind(&role)
        .bind(patch.is_active.unwrap_or(row.is_active))
        .bind(patch.password_hash.unwrap_or(row.password_hash))
        .bind(now_string())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_account(id).await?.ok_or(Error::NotFound("account"))
    }

    /// Hard-delete an account. Refused for the last remaining admin.
    /// Follower counters are released with the allocations; ledger history
    /// is kept.
    pub async fn delete_account(&self, id: &str) -> Result<()> {
        let mut tx = self.begin().await?;

        let row = fetch_account_row(&mut tx, id)
            .await?
            .ok_or(Error::NotFound("account"))?;

        if row.role == Role::Admin.as_str() {
            let (admins,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE role = 'admin'")
                    .fetch_one(&mut *tx)
                    .await?;
            if admins <= 1 {
                return Err(Error::LastAdminProtection);
            }
        }

        let trader_ids: Vec<(String,)> =
            sqlx::query_as("SELECT trader_id FROM copied_traders WHERE account_id = ?")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        for (trader_id,) in trader_ids {
            super::traders::adjust_followers(&mut tx, &trader_id, -1).await?;
        }

        sqlx::query("DELETE FROM copied_traders WHERE account_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ---- transaction-scoped helpers used by the ledger engine ----

pub(crate) async fn fetch_account_row(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<AccountRow>> {
    let row = sqlx::query_as("SELECT * FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Persist a balance snapshot computed inside the current scope.
pub(crate) async fn store_balances(
    conn: &mut SqliteConnection,
    id: &str,
    wallet: Decimal,
    trading: Decimal,
    profits: Decimal,
) -> Result<()> {
    sqlx::query(
        "UPDATE accounts SET wallet_balance = ?, trading_balance = ?, total_profits = ?, updated_at = ? WHERE id = ?",
    )
    .bind(wallet.to_string())
    .bind(trading.to_string())
    .bind(profits.to_string())
    .bind(now_string())
    .bind(id)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn set_account_type(
    conn: &mut SqliteConnection,
    id: &str,
    account_type: AccountType,
) -> Result<()> {
    sqlx::query("UPDATE accounts SET account_type = ?, updated_at = ? WHERE id = ?")
        .bind(account_type.as_str())
        .bind(now_string())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub(crate) async fn fetch_allocation(
    conn: &mut SqliteConnection,
    account_id: &str,
    trader_id: &str,
) -> Result<Option<Decimal>> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT amount_allocated FROM copied_traders WHERE account_id = ? AND trader_id = ?",
    )
    .bind(account_id)
    .bind(trader_id)
    .fetch_optional(conn)
    .await?;

    match row {
        Some((raw,)) => parse_amount(&raw, "amount_allocated").map(Some),
        None => Ok(None),
    }
}

pub(crate) async fn insert_allocation(
    conn: &mut SqliteConnection,
    account_id: &str,
    trader_id: &str,
    amount: Decimal,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO copied_traders (account_id, trader_id, amount_allocated, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(account_id)
    .bind(trader_id)
    .bind(amount.to_string())
    .bind(now_string())
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn delete_allocation(
    conn: &mut SqliteConnection,
    account_id: &str,
    trader_id: &str,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM copied_traders WHERE account_id = ? AND trader_id = ?")
        .bind(account_id)
        .bind(trader_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_allocations(
    conn: &mut SqliteConnection,
    account_id: &str,
) -> Result<Vec<CopiedTrader>> {
    let rows: Vec<AllocationRow> = sqlx::query_as(
        "SELECT account_id, trader_id, amount_allocated FROM copied_traders WHERE account_id = ? ORDER BY created_at",
    )
    .bind(account_id)
    .fetch_all(conn)
    .await?;

    rows.into_iter()
        .map(|a| {
            Ok(CopiedTrader {
                amount_allocated: parse_amount(&a.amount_allocated, "amount_allocated")?,
                trader_id: a.trader_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    fn new_account(email: &str, role: Role) -> NewAccount {
        NewAccount {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$hash".to_string(),
            currency: "USD".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_round_trip() {
        let db = test_db().await;
        let account = db
            .insert_account(new_account("Ada@Example.COM", Role::User))
            .await
            .unwrap();

        assert_eq!(account.email, "ada@example.com");
        assert_eq!(account.wallet_balance, Decimal::ZERO);
        assert!(account.copied_traders.is_empty());

        let by_email = db
            .get_account_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, account.id);
    }

    #[tokio::test]
    async fn duplicate_email_rejected_by_store() {
        let db = test_db().await;
        db.insert_account(new_account("dup@example.com", Role::User))
            .await
            .unwrap();
        let err = db
            .insert_account(new_account("dup@example.com", Role::User))
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn admin_update_adjusts_balances() {
        let db = test_db().await;
        let account = db
            .insert_account(new_account("bal@example.com", Role::User))
            .await
            .unwrap();

        let updated = db
            .admin_update_account(
                &account.id,
                AccountPatch {
                    wallet_balance: Some(dec!(250.75)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.wallet_balance, dec!(250.75));

        let err = db
            .admin_update_account(
                &account.id,
                AccountPatch {
                    trading_balance: Some(dec!(-1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn last_admin_cannot_be_deleted() {
        let db = test_db().await;
        let only_admin = db
            .insert_account(new_account("admin@example.com", Role::Admin))
            .await
            .unwrap();

        let err = db.delete_account(&only_admin.id).await;
        assert!(matches!(err, Err(Error::LastAdminProtection)));

        // A second admin lifts the protection.
        let second = db
            .insert_account(new_account("admin2@example.com", Role::Admin))
            .await
            .unwrap();
        db.delete_account(&second.id).await.unwrap();
        assert!(db.get_account(&second.id).await.unwrap().is_none());
    }
}
