use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::warn;

use backend_domain::ports::IdentityProvider;
use backend_domain::{RuntimeConfig, UserRole};

/// Role lookup against the external identity provider: one configured
/// endpoint, bounded fixed-delay retries. A 404 is an answer (the id is
/// unknown), not a transport failure.
#[derive(Default)]
pub struct HttpIdentityProvider;

impl HttpIdentityProvider {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct RoleResponse {
    role: String,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn lookup_role(
        &self,
        config: &RuntimeConfig,
        clerk_id: &str,
    ) -> Result<Option<UserRole>> {
        let base = config
            .identity_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("identity url not configured"))?;
        let url = format!("{}/{}", base.trim_end_matches('/'), clerk_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        let attempts = config.identity_retry_attempts.max(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            match client.get(&url).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return Ok(None);
                }
                Ok(response) => match response.error_for_status() {
                    Ok(response) => {
                        let body: RoleResponse = response.json().await?;
                        return Ok(UserRole::parse(&body.role));
                    }
                    Err(err) => last_err = Some(err.into()),
                },
                Err(err) => last_err = Some(err.into()),
            }
            if attempt < attempts {
                warn!(attempt, "identity lookup attempt failed, retrying");
                tokio::time::sleep(Duration::from_millis(config.identity_retry_delay_ms)).await;
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("identity lookup failed")))
    }
}
