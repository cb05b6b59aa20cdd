use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::warn;

use backend_domain::ports::Notifier;
use backend_domain::{NotifyDeliveryRecord, RuntimeConfig};

const MAX_DELIVERY_RECORDS: usize = 50;

/// Webhook notifier. Delivery is spawned off the request path; the state
/// machine never waits on it and never sees its result. Each attempt is
/// recorded in a bounded buffer for the ops surface.
#[derive(Default)]
pub struct WebhookNotifier {
    deliveries: Arc<RwLock<VecDeque<NotifyDeliveryRecord>>>,
}

impl WebhookNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn spawn_send(&self, config: RuntimeConfig, message: String) {
        let deliveries = self.deliveries.clone();
        tokio::spawn(async move {
            let result = send_webhook(&config, &message).await;
            let record = NotifyDeliveryRecord {
                timestamp_ms: Utc::now().timestamp_millis(),
                status: if result.is_ok() { "ok" } else { "error" }.to_string(),
                message,
                error: result.as_ref().err().map(ToString::to_string),
            };
            if let Err(err) = &result {
                warn!("notification delivery failed: {}", err);
            }
            let mut records = deliveries.write().await;
            records.push_front(record);
            records.truncate(MAX_DELIVERY_RECORDS);
        });
    }

    async fn check_notify_target(&self, config: &RuntimeConfig) -> Result<()> {
        let url = resolve_notify_url(config)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("notify webhook responded {}", response.status());
        }
        Ok(())
    }

    async fn recent_deliveries(&self, limit: usize) -> Vec<NotifyDeliveryRecord> {
        let records = self.deliveries.read().await;
        records.iter().take(limit).cloned().collect()
    }
}

async fn send_webhook(config: &RuntimeConfig, message: &str) -> Result<()> {
    let url = resolve_notify_url(config)?;
    let template = config
        .notify_webhook_template
        .as_deref()
        .unwrap_or(r#"{"message":{message}}"#);
    let payload = template.replace("{message}", &serde_json::to_string(message)?);

    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?;
    client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

fn resolve_notify_url(config: &RuntimeConfig) -> Result<String> {
    if let Some(url) = &config.notify_webhook_url {
        if !url.trim().is_empty() {
            return Ok(url.clone());
        }
    }
    anyhow::bail!("notify webhook url not configured")
}
