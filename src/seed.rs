//! Bootstrap tooling: load the trader catalog from a JSON file and make
//! sure an admin account exists. Driven by the `seed` CLI subcommand.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::auth;
use crate::db::{Database, NewAccount, NewTrader};
use crate::models::Role;

/// One catalog entry as it appears in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedTrader {
    name: String,
    avatar: String,
    #[serde(default)]
    strategy: Option<String>,
    roi: String,
    win_rate: String,
    #[serde(default)]
    max_drawdown: Option<String>,
    #[serde(default)]
    is_public: Option<bool>,
    #[serde(default)]
    is_trending: Option<bool>,
}

/// Replace the trader catalog with the contents of a JSON file.
pub async fn seed_traders(db: &Database, path: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entries: Vec<SeedTrader> =
        serde_json::from_str(&raw).context("Seed file is not a JSON array of traders")?;

    // Fresh start: the catalog is admin-authored reference data, not user
    // state, so replacing it wholesale is safe.
    sqlx::query("DELETE FROM traders")
        .execute(db.pool())
        .await
        .context("Failed to clear existing traders")?;

    let count = entries.len();
    for entry in entries {
        db.insert_trader(NewTrader {
            name: entry.name,
            avatar: entry.avatar,
            strategy: entry.strategy.unwrap_or_else(|| "Institutional".to_string()),
            roi: entry.roi,
            win_rate: entry.win_rate,
            max_drawdown: entry.max_drawdown.unwrap_or_else(|| "-0.0%".to_string()),
            is_public: entry.is_public.unwrap_or(true),
            is_trending: entry.is_trending.unwrap_or(false),
        })
        .await?;
    }

    info!(count, "trader catalog seeded");
    Ok(count)
}

/// Create the admin account if no account exists under the given email.
pub async fn ensure_admin(db: &Database, email: &str, password: &str) -> Result<()> {
    if db.get_account_by_email(email).await?.is_some() {
        info!(email, "admin account already present");
        return Ok(());
    }

    let password_hash = auth::hash_password(password)?;
    let account = db
        .insert_account(NewAccount {
            first_name: "System".to_string(),
            last_name: "Admin".to_string(),
            email: email.to_string(),
            password_hash,
            currency: "USD".to_string(),
            role: Role::Admin,
        })
        .await?;

    info!(account = %account.id, email, "admin account created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_replaces_the_catalog() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        let dir = std::env::temp_dir().join(format!("copydesk-seed-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("traders.json");
        tokio::fs::write(
            &path,
            r#"[
                {"name": "Alpha", "avatar": "AL", "roi": "+12.0%", "winRate": "61%"},
                {"name": "Beta", "avatar": "BE", "roi": "+43.7%", "winRate": "70%", "isTrending": true}
            ]"#,
        )
        .await
        .unwrap();

        let count = seed_traders(&db, &path).await.unwrap();
        assert_eq!(count, 2);

        let listed = db.list_public_traders().await.unwrap();
        assert_eq!(listed.len(), 2);

        // Re-seeding does not accumulate.
        seed_traders(&db, &path).await.unwrap();
        assert_eq!(db.list_public_traders().await.unwrap().len(), 2);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        ensure_admin(&db, "ops@example.com", "a-strong-password")
            .await
            .unwrap();
        ensure_admin(&db, "ops@example.com", "a-strong-password")
            .await
            .unwrap();

        let admin = db
            .get_account_by_email("ops@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin());
    }
}
