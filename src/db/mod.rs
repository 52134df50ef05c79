//! SQLite persistence: pool construction, migrations, and per-entity queries.
//!
//! Monetary columns are canonical `Decimal` strings, never floats: all
//! balance math happens in Rust inside a transaction scope, so SQL-side
//! arithmetic on amounts is deliberately impossible. Row structs mirror the
//! stored shape and convert explicitly into domain models.

pub(crate) mod accounts;
mod chat;
pub(crate) mod traders;
pub(crate) mod transactions;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use accounts::{AccountPatch, NewAccount, ProfilePatch};
pub use traders::{NewTrader, TraderPatch};

/// Database handle with full schema management.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool and run migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .busy_timeout(Duration::from_secs(5));

        // An in-memory SQLite database exists per connection; keep a single
        // connection so every query sees the same schema.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Open a transactional scope for a multi-entity ledger operation.
    /// Dropping the scope without committing rolls every write back.
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Get the connection pool (for single-statement reads).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                currency TEXT NOT NULL DEFAULT 'USD',
                wallet_balance TEXT NOT NULL DEFAULT '0',
                trading_balance TEXT NOT NULL DEFAULT '0',
                total_profits TEXT NOT NULL DEFAULT '0',
                account_type TEXT NOT NULL DEFAULT 'basic',
                role TEXT NOT NULL DEFAULT 'user',
                is_active INTEGER NOT NULL DEFAULT 1,
                last_login TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS traders (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                avatar TEXT NOT NULL,
                strategy TEXT NOT NULL DEFAULT 'Institutional',
                roi TEXT NOT NULL,
                win_rate TEXT NOT NULL,
                max_drawdown TEXT NOT NULL DEFAULT '-0.0%',
                followers INTEGER NOT NULL DEFAULT 0,
                is_public INTEGER NOT NULL DEFAULT 1,
                is_trending INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // One allocation per (account, trader); the primary key doubles as
        // the duplicate-copy guard under concurrent requests.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS copied_traders (
                account_id TEXT NOT NULL REFERENCES accounts(id),
                trader_id TEXT NOT NULL REFERENCES traders(id),
                amount_allocated TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (account_id, trader_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL REFERENCES accounts(id),
                kind TEXT NOT NULL,
                amount TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                method TEXT,
                reference_id TEXT,
                description TEXT,
                proof_image TEXT,
                plan_name TEXT,
                signal_type TEXT,
                staking_duration INTEGER,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                room TEXT NOT NULL,
                sender_id TEXT NOT NULL,
                body TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'sent',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Indexes
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_transactions_status ON transactions(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_copied_traders_account ON copied_traders(account_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chat_messages_room ON chat_messages(room)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Current time in the canonical stored form.
pub(crate) fn now_string() -> String {
    Utc::now().to_rfc3339()
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parse a stored timestamp. Accepts RFC 3339 and SQLite's
/// `CURRENT_TIMESTAMP` form.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, crate::error::Error> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| crate::error::Error::Corrupt(format!("timestamp: {raw}")))
}

/// Parse a stored monetary amount.
pub(crate) fn parse_amount(raw: &str, column: &str) -> Result<Decimal, crate::error::Error> {
    raw.parse::<Decimal>()
        .map_err(|_| crate::error::Error::Corrupt(format!("{column}: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn migrations_create_schema() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn timestamp_forms_parse() {
        assert!(parse_timestamp("2026-01-05T10:30:00+00:00").is_ok());
        assert!(parse_timestamp("2026-01-05 10:30:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn amounts_parse_exactly() {
        assert_eq!(parse_amount("10.05", "wallet_balance").unwrap(), dec!(10.05));
        assert!(parse_amount("NaN-ish", "wallet_balance").is_err());
    }
}
