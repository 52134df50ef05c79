//! Transaction ledger: append-mostly log of monetary events.

use sqlx::SqliteConnection;

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionKind, TransactionStatus};

use super::{format_timestamp, parse_amount, parse_timestamp, Database};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: String,
    pub account_id: String,
    pub kind: String,
    pub amount: String,
    pub status: String,
    pub method: Option<String>,
    pub reference_id: Option<String>,
    pub description: Option<String>,
    pub proof_image: Option<String>,
    pub plan_name: Option<String>,
    pub signal_type: Option<String>,
    pub staking_duration: Option<i64>,
    pub created_at: String,
}

impl TransactionRow {
    pub fn kind(&self) -> Result<TransactionKind> {
        self.kind
            .parse::<TransactionKind>()
            .map_err(|e| Error::Corrupt(e.to_string()))
    }

    pub fn status(&self) -> Result<TransactionStatus> {
        self.status
            .parse::<TransactionStatus>()
            .map_err(|e| Error::Corrupt(e.to_string()))
    }

    pub fn amount(&self) -> Result<rust_decimal::Decimal> {
        parse_amount(&self.amount, "amount")
    }

    pub fn into_transaction(self) -> Result<Transaction> {
        Ok(Transaction {
            kind: self
                .kind
                .parse::<TransactionKind>()
                .map_err(|e| Error::Corrupt(e.to_string()))?,
            status: self
                .status
                .parse::<TransactionStatus>()
                .map_err(|e| Error::Corrupt(e.to_string()))?,
            amount: parse_amount(&self.amount, "amount")?,
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            account_id: self.account_id,
            method: self.method,
            reference_id: self.reference_id,
            description: self.description,
            proof_image: self.proof_image,
            plan_name: self.plan_name,
            signal_type: self.signal_type,
            staking_duration: self.staking_duration,
        })
    }
}

impl Database {
    /// Ledger history for one account, newest first.
    pub async fn list_transactions_for(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            "SELECT * FROM transactions WHERE account_id = ? ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    /// The whole ledger, newest first.
    pub async fn list_all_transactions(&self) -> Result<Vec<Transaction>> {
        let rows: Vec<TransactionRow> =
            sqlx::query_as("SELECT * FROM transactions ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let row: Option<TransactionRow> = sqlx::query_as("SELECT * FROM transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TransactionRow::into_transaction).transpose()
    }
}

// ---- transaction-scoped helpers used by the ledger engine ----

/// Append one ledger entry inside the current scope.
pub(crate) async fn insert_entry(conn: &mut SqliteConnection, entry: &Transaction) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, account_id, kind, amount, status, method, reference_id,
            description, proof_image, plan_name, signal_type,
            staking_duration, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.account_id)
    .bind(entry.kind.as_str())
    .bind(entry.amount.to_string())
    .bind(entry.status.as_str())
    .bind(&entry.method)
    .bind(&entry.reference_id)
    .bind(&entry.description)
    .bind(&entry.proof_image)
    .bind(&entry.plan_name)
    .bind(&entry.signal_type)
    .bind(entry.staking_duration)
    .bind(format_timestamp(entry.created_at))
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_entry_row(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<TransactionRow>> {
    let row = sqlx::query_as("SELECT * FROM transactions WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub(crate) async fn set_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: TransactionStatus,
) -> Result<()> {
    sqlx::query("UPDATE transactions SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
