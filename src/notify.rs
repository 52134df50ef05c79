//! Outbound notification delivery — a non-critical collaborator.
//!
//! Delivery runs outside the primary request path: the caller gets its
//! success response regardless of what happens here. Failures are retried
//! briefly, then logged and dropped.

use std::time::Duration;

use anyhow::{Context, Result};
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::error::Error;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_WINDOW: Duration = Duration::from_secs(30);

/// Webhook client for operator notifications.
#[derive(Clone)]
pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Announce a contact-form submission. Fire-and-forget: spawns the
    /// delivery and returns immediately.
    pub fn contact_submitted(&self, name: &str, email: &str, message: &str) {
        let Some(url) = self.webhook_url.clone() else {
            info!("no contact webhook configured, skipping notification");
            return;
        };

        let client = self.client.clone();
        let payload = json!({
            "subject": format!("New inquiry from {name}"),
            "name": name,
            "email": email,
            "message": message,
        });

        tokio::spawn(async move {
            match deliver(&client, &url, &payload).await {
                Ok(()) => info!("contact notification delivered"),
                // The message is already stored; the operator only misses
                // the ping.
                Err(e) => warn!(error = %e, "contact notification delivery failed"),
            }
        });
    }
}

async fn deliver(client: &Client, url: &str, payload: &serde_json::Value) -> Result<(), Error> {
    let policy = ExponentialBackoff {
        max_elapsed_time: Some(RETRY_WINDOW),
        ..Default::default()
    };

    backoff::future::retry(policy, || async {
        let response = client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| backoff::Error::transient(Error::Upstream(e.to_string())))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(backoff::Error::transient(Error::Upstream(format!(
                "webhook returned {status}"
            ))));
        }
        if !status.is_success() {
            return Err(backoff::Error::permanent(Error::Upstream(format!(
                "webhook returned {status}"
            ))));
        }
        Ok(())
    })
    .await
}
