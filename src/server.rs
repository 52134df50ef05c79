//! Server assembly: shared state, middleware stack, and the listen loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::api;
use crate::config::AppConfig;
use crate::db::Database;
use crate::ledger::LedgerEngine;
use crate::notify::Notifier;

/// Everything handlers need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ledger: LedgerEngine,
    pub config: Arc<AppConfig>,
    pub notifier: Notifier,
}

/// Bring the service up and block until it exits.
pub async fn run(config: AppConfig) -> Result<()> {
    let db = Database::new(&config.database_url).await?;
    let ledger = LedgerEngine::new(db.clone());
    let notifier = Notifier::new(config.contact_webhook_url.clone())?;
    let config = Arc::new(config);

    if let Some(url) = config.keepalive_url.clone() {
        spawn_keepalive(url, config.keepalive_interval_secs);
    }

    let state = AppState {
        db,
        ledger,
        config: config.clone(),
        notifier,
    };

    let app = api::api_router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "broker API listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Periodically ping our own public URL so free-tier hosting keeps the
/// process warm.
fn spawn_keepalive(url: String, interval_secs: u64) {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "keep-alive client unavailable");
                return;
            }
        };

        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; skip it so we only ping on
        // the interval.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %url, "keep-alive ping ok");
                }
                Ok(response) => {
                    warn!(status = %response.status(), "keep-alive ping rejected");
                }
                Err(e) => warn!(error = %e, "keep-alive ping failed"),
            }
        }
    });
}
