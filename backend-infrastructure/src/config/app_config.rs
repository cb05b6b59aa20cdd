use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub device_secret: Option<String>,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub notify_webhook_url: Option<String>,
    pub notify_webhook_template: Option<String>,
    pub identity_url: Option<String>,
    pub identity_retry_attempts: u32,
    pub identity_retry_delay_ms: u64,
    pub payout_amount: i64,
    pub transfer_amount: i64,
    pub allow_negative_customer_balance: bool,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            api_token: None,
            device_secret: None,
            database_url: None,
            db_max_connections: 5,
            notify_webhook_url: None,
            notify_webhook_template: None,
            identity_url: None,
            identity_retry_attempts: 3,
            identity_retry_delay_ms: 500,
            payout_amount: 60,
            transfer_amount: 100,
            allow_negative_customer_balance: true,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("WHIRL_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        for field in [
            &mut self.api_token,
            &mut self.device_secret,
            &mut self.database_url,
            &mut self.notify_webhook_url,
            &mut self.notify_webhook_template,
            &mut self.identity_url,
        ] {
            if let Some(value) = field {
                if value.trim().is_empty() {
                    *field = None;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.db_max_connections == 0 {
            return Err(anyhow!("db_max_connections must be greater than 0"));
        }
        if self.payout_amount <= 0 {
            return Err(anyhow!("payout_amount must be positive"));
        }
        if self.transfer_amount <= 0 {
            return Err(anyhow!("transfer_amount must be positive"));
        }
        if self.identity_retry_attempts == 0 {
            return Err(anyhow!("identity_retry_attempts must be at least 1"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            device_secret: self.device_secret.clone(),
            notify_webhook_url: self.notify_webhook_url.clone(),
            notify_webhook_template: self.notify_webhook_template.clone(),
            identity_url: self.identity_url.clone(),
            identity_retry_attempts: self.identity_retry_attempts,
            identity_retry_delay_ms: self.identity_retry_delay_ms,
            payout_amount: self.payout_amount,
            transfer_amount: self.transfer_amount,
            allow_negative_customer_balance: self.allow_negative_customer_balance,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            database_url: self.database_url.clone(),
            db_max_connections: self.db_max_connections,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("WHIRL_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("WHIRL_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("WHIRL_DEVICE_SECRET") {
            self.device_secret = Some(value);
        }
        if let Ok(value) = env::var("WHIRL_DATABASE_URL") {
            self.database_url = Some(value);
        }
        if let Ok(value) = env::var("WHIRL_DB_MAX_CONNECTIONS") {
            self.db_max_connections = value.parse().unwrap_or(self.db_max_connections);
        }
        if let Ok(value) = env::var("WHIRL_NOTIFY_WEBHOOK_URL") {
            self.notify_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("WHIRL_NOTIFY_WEBHOOK_TEMPLATE") {
            self.notify_webhook_template = Some(value);
        }
        if let Ok(value) = env::var("WHIRL_IDENTITY_URL") {
            self.identity_url = Some(value);
        }
        if let Ok(value) = env::var("WHIRL_IDENTITY_RETRY_ATTEMPTS") {
            self.identity_retry_attempts = value.parse().unwrap_or(self.identity_retry_attempts);
        }
        if let Ok(value) = env::var("WHIRL_IDENTITY_RETRY_DELAY_MS") {
            self.identity_retry_delay_ms = value.parse().unwrap_or(self.identity_retry_delay_ms);
        }
        if let Ok(value) = env::var("WHIRL_PAYOUT_AMOUNT") {
            self.payout_amount = value.parse().unwrap_or(self.payout_amount);
        }
        if let Ok(value) = env::var("WHIRL_TRANSFER_AMOUNT") {
            self.transfer_amount = value.parse().unwrap_or(self.transfer_amount);
        }
        if let Ok(value) = env::var("WHIRL_ALLOW_NEGATIVE_CUSTOMER_BALANCE") {
            self.allow_negative_customer_balance =
                value.parse().unwrap_or(self.allow_negative_customer_balance);
        }
        if let Ok(value) = env::var("WHIRL_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("WHIRL_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.payout_amount, 60);
        assert_eq!(config.transfer_amount, 100);
        assert!(config.allow_negative_customer_balance);
    }

    #[test]
    fn blank_optionals_normalize_to_none() {
        let mut config = AppConfig {
            api_token: Some("  ".to_string()),
            notify_webhook_url: Some(String::new()),
            ..AppConfig::default()
        };
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.notify_webhook_url.is_none());
    }

    #[test]
    fn nonpositive_amounts_are_rejected() {
        let config = AppConfig {
            payout_amount: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
