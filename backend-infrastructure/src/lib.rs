// Backend Infrastructure Layer

pub mod config;
pub mod repositories;
pub mod services;

pub use config::AppConfig;
pub use repositories::{MemoryStore, PostgresStore};
pub use services::{HttpIdentityProvider, WebhookNotifier};
