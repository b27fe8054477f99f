use std::time::Duration;

use anyhow::Context;
use phonebook_core::DEFAULT_BASE_URL;
use url::Url;

use crate::sync::notification::DEFAULT_NOTIFICATION_SECS;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Clone, Debug)]
pub struct PhonebookConfig {
    pub base_url: Url,
    pub notification_ttl: Duration,
    pub log_filter: String,
}

impl PhonebookConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("PHONEBOOK_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;
        let notification_ttl = Duration::from_secs(read_u64_env(
            "PHONEBOOK_NOTIFICATION_SECS",
            DEFAULT_NOTIFICATION_SECS,
        ));
        let log_filter =
            std::env::var("PHONEBOOK_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            base_url,
            notification_ttl,
            log_filter,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> anyhow::Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }
}

fn parse_base_url(value: &str) -> anyhow::Result<Url> {
    Url::parse(value.trim()).with_context(|| format!("invalid collection url {value:?}"))
}

fn read_u64_env(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
