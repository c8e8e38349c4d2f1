pub mod analysis;
pub mod domain;
pub mod engine;
pub mod ingest;
pub mod sentiment;
pub mod service;

pub use engine::{score_recommendations, score_recommendations_concurrent, score_sentiment};

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_PORT: u16 = 5000;
    pub const MAX_HISTORY_DAYS: u32 = 3650;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub port: Option<u16>,
        pub history_days: Option<u32>,
        pub synthetic_seed: Option<u64>,
        pub news_provider_base_url: Option<String>,
        pub news_provider_api_key: Option<String>,
        pub news_provider_timeout_secs: Option<u64>,
        pub news_provider_retries: Option<u32>,
        pub news_fixtures_path: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self {
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                port: parsed_var("PORT")?,
                history_days: parsed_var("HISTORY_DAYS")?,
                synthetic_seed: parsed_var("SYNTHETIC_SEED")?,
                news_provider_base_url: non_empty_var("NEWS_PROVIDER_BASE_URL"),
                news_provider_api_key: non_empty_var("NEWS_PROVIDER_API_KEY"),
                news_provider_timeout_secs: parsed_var("NEWS_PROVIDER_TIMEOUT_SECS")?,
                news_provider_retries: parsed_var("NEWS_PROVIDER_RETRIES")?,
                news_fixtures_path: non_empty_var("NEWS_FIXTURES_PATH"),
            }
            .validate()
        }

        pub fn validate(self) -> anyhow::Result<Self> {
            if let Some(days) = self.history_days {
                anyhow::ensure!(
                    (1..=MAX_HISTORY_DAYS).contains(&days),
                    "HISTORY_DAYS must be between 1 and {MAX_HISTORY_DAYS}, got {days}"
                );
            }
            Ok(self)
        }

        pub fn port(&self) -> u16 {
            self.port.unwrap_or(DEFAULT_PORT)
        }

        pub fn history_days(&self) -> u32 {
            self.history_days
                .unwrap_or(crate::service::recommendation::DEFAULT_HISTORY_DAYS)
        }

        pub fn require_news_provider_base_url(&self) -> anyhow::Result<&str> {
            self.news_provider_base_url
                .as_deref()
                .context("NEWS_PROVIDER_BASE_URL is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    fn parsed_var<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        non_empty_var(key)
            .map(|s| s.trim().parse::<T>().with_context(|| format!("{key} is invalid: {s}")))
            .transpose()
    }

}

pub mod providers {
    use crate::config::Settings;
    use crate::ingest::news::StaticNewsProvider;
    use crate::ingest::provider::{HttpNewsProvider, NewsProvider, PriceHistoryProvider};
    use crate::ingest::synthetic::SyntheticPriceProvider;
    use std::sync::Arc;

    pub fn price_provider(settings: &Settings) -> Arc<dyn PriceHistoryProvider> {
        Arc::new(SyntheticPriceProvider::new(settings.synthetic_seed))
    }

    /// HTTP when a base URL is configured, otherwise fixtures (or nothing) from memory.
    pub fn news_provider(settings: &Settings) -> anyhow::Result<Arc<dyn NewsProvider>> {
        if settings.news_provider_base_url.is_some() {
            return Ok(Arc::new(HttpNewsProvider::from_settings(settings)?));
        }
        match settings.news_fixtures_path.as_deref() {
            Some(path) => Ok(Arc::new(StaticNewsProvider::from_fixture_file(path)?)),
            None => {
                tracing::warn!("no news provider configured; symbol news will be empty");
                Ok(Arc::new(StaticNewsProvider::default()))
            }
        }
    }
}
