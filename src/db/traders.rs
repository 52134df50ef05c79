//! Trader registry: strategist profiles and the follower counter.

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Trader;

use super::{now_string, parse_timestamp, Database};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TraderRow {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub strategy: String,
    pub roi: String,
    pub win_rate: String,
    pub max_drawdown: String,
    pub followers: i64,
    pub is_public: bool,
    pub is_trending: bool,
    pub created_at: String,
}

impl TraderRow {
    pub fn into_trader(self) -> Result<Trader> {
        Ok(Trader {
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            name: self.name,
            avatar: self.avatar,
            strategy: self.strategy,
            roi: self.roi,
            win_rate: self.win_rate,
            max_drawdown: self.max_drawdown,
            followers: self.followers,
            is_public: self.is_public,
            is_trending: self.is_trending,
        })
    }
}

/// Admin-authored profile fields for a new trader.
#[derive(Debug, Clone)]
pub struct NewTrader {
    pub name: String,
    pub avatar: String,
    pub strategy: String,
    pub roi: String,
    pub win_rate: String,
    pub max_drawdown: String,
    pub is_public: bool,
    pub is_trending: bool,
}

/// Partial trader update; `None` leaves the field untouched. The follower
/// counter is deliberately absent: only copy operations maintain it.
#[derive(Debug, Default, Clone)]
pub struct TraderPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub strategy: Option<String>,
    pub roi: Option<String>,
    pub win_rate: Option<String>,
    pub max_drawdown: Option<String>,
    pub is_public: Option<bool>,
    pub is_trending: Option<bool>,
}

impl Database {
    pub async fn insert_trader(&self, new: NewTrader) -> Result<Trader> {
        let id = Uuid::new_v4().to_string();
        let now = now_string();

        sqlx::query(
            r#"
            INSERT INTO traders (
                id, name, avatar, strategy, roi, win_rate, max_drawdown,
                is_public, is_trending, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.avatar)
        .bind(&new.strategy)
        .bind(&new.roi)
        .bind(&new.win_rate)
        .bind(&new.max_drawdown)
        .bind(new.is_public)
        .bind(new.is_trending)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_trader(&id).await?.ok_or(Error::NotFound("trader"))
    }

    pub async fn get_trader(&self, id: &str) -> Result<Option<Trader>> {
        let row: Option<TraderRow> = sqlx::query_as("SELECT * FROM traders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TraderRow::into_trader).transpose()
    }

    /// Public traders for the discovery grid, most-followed first.
    pub async fn list_public_traders(&self) -> Result<Vec<Trader>> {
        let rows: Vec<TraderRow> =
            sqlx::query_as("SELECT * FROM traders WHERE is_public = 1 ORDER BY followers DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(TraderRow::into_trader).collect()
    }

    /// Every trader, hidden profiles included, newest first.
    pub async fn list_all_traders(&self) -> Result<Vec<Trader>> {
        let rows: Vec<TraderRow> =
            sqlx::query_as("SELECT * FROM traders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(TraderRow::into_trader).collect()
    }

    pub async fn update_trader(&self, id: &str, patch: TraderPatch) -> Result<Trader> {
        let mut tx = self.begin().await?;

        let row: TraderRow = sqlx::query_as("SELECT * FROM traders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(Error::NotFound("trader"))?;

        sqlx::query(
            r#"
            UPDATE traders SET
                name = ?, avatar = ?, strategy = ?, roi = ?, win_rate = ?,
                max_drawdown = ?, is_public = ?, is_trending = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.name.unwrap_or(row.name))
        .bind(patch.avatar.unwrap_or(row.avatar))
        .bind(patch.strategy.unwrap_or(row.strategy))
        .bind(patch.roi.unwrap_or(row.roi))
        .bind(patch.win_rate.unwrap_or(row.win_rate))
        .bind(patch.max_drawdown.unwrap_or(row.max_drawdown))
        .bind(patch.is_public.unwrap_or(row.is_public))
        .bind(patch.is_trending.unwrap_or(row.is_trending))
        .bind(now_string())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_trader(id).await?.ok_or(Error::NotFound("trader"))
    }

    /// Remove a trader from the registry. While accounts still hold
    /// allocations against it the profile is only hidden, so existing
    /// allocation edges stay resolvable.
    pub async fn remove_trader(&self, id: &str) -> Result<()> {
        let mut tx = self.begin().await?;

        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM traders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound("trader"));
        }

        let (referenced,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM copied_traders WHERE trader_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if referenced > 0 {
            sqlx::query("UPDATE traders SET is_public = 0, updated_at = ? WHERE id = ?")
                .bind(now_string())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("DELETE FROM traders WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// ---- transaction-scoped helpers used by the ledger engine ----

pub(crate) async fn fetch_trader_row(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<TraderRow>> {
    let row = sqlx::query_as("SELECT * FROM traders WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Bump the follower counter. A missing trader row is tolerated so that
/// stopping a copy of a since-removed trader still releases the funds.
pub(crate) async fn adjust_followers(
    conn: &mut SqliteConnection,
    trader_id: &str,
    delta: i64,
) -> Result<()> {
    sqlx::query("UPDATE traders SET followers = followers + ?, updated_at = ? WHERE id = ?")
        .bind(delta)
        .bind(now_string())
        .bind(trader_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> NewTrader {
        NewTrader {
            name: name.to_string(),
            avatar: "AK".to_string(),
            strategy: "Scalping".to_string(),
            roi: "+124.5%".to_string(),
            win_rate: "87%".to_string(),
            max_drawdown: "-4.2%".to_string(),
            is_public: true,
            is_trending: false,
        }
    }

    #[tokio::test]
    async fn public_listing_sorts_by_followers() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let quiet = db.insert_trader(sample("Quiet")).await.unwrap();
        let busy = db.insert_trader(sample("Busy")).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        adjust_followers(&mut tx, &busy.id, 3).await.unwrap();
        tx.commit().await.unwrap();

        let listed = db.list_public_traders().await.unwrap();
        assert_eq!(listed[0].id, busy.id);
        assert_eq!(listed[0].followers, 3);
        assert_eq!(listed[1].id, quiet.id);
    }

    #[tokio::test]
    async fn hidden_traders_stay_off_the_grid() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let trader = db.insert_trader(sample("Ghost")).await.unwrap();
        db.update_trader(
            &trader.id,
            TraderPatch {
                is_public: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(db.list_public_traders().await.unwrap().is_empty());
        assert_eq!(db.list_all_traders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreferenced_trader_is_deleted_outright() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let trader = db.insert_trader(sample("Temp")).await.unwrap();
        db.remove_trader(&trader.id).await.unwrap();
        assert!(db.get_trader(&trader.id).await.unwrap().is_none());
    }
}
