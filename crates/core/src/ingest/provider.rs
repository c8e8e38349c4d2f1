use crate::config::Settings;
use crate::domain::price::PriceSeries;
use crate::ingest::types::{NewsFeedResponse, NewsItem};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/v1/news";
const DEFAULT_RETRIES: u32 = 3;

#[async_trait::async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Daily history covering the last `days` calendar days, ascending.
    async fn fetch_history(&self, symbol: &str, days: u32) -> Result<PriceSeries>;
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_news(
        &self,
        symbol: &str,
        sources: Option<&[String]>,
        days: u32,
    ) -> Result<Vec<NewsItem>>;
}

/// News over a JSON HTTP endpoint: `GET {base}{path}?symbol=..&days=..[&sources=a,b]`.
#[derive(Debug, Clone)]
pub struct HttpNewsProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
    retries: u32,
}

impl HttpNewsProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_news_provider_base_url()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                settings.news_provider_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .build()
            .context("failed to build news provider http client")?;

        Ok(Self {
            http,
            base_url,
            api_key: settings.news_provider_api_key.clone(),
            path: DEFAULT_PATH.to_string(),
            retries: settings.news_provider_retries.unwrap_or(DEFAULT_RETRIES).max(1),
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        sources: Option<&[String]>,
        days: u32,
    ) -> Result<NewsFeedResponse> {
        let mut query = vec![("symbol", symbol.to_string()), ("days", days.to_string())];
        if let Some(sources) = sources.filter(|s| !s.is_empty()) {
            query.push(("sources", sources.join(",")));
        }

        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .query(&query)
            .send()
            .await
            .context("news provider request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read news provider response")?;

        if !status.is_success() {
            anyhow::bail!("news provider HTTP {status}: {text}");
        }

        serde_json::from_str::<NewsFeedResponse>(&text)
            .with_context(|| format!("failed to parse news provider response: {text}"))
    }
}

#[async_trait::async_trait]
impl NewsProvider for HttpNewsProvider {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn fetch_news(
        &self,
        symbol: &str,
        sources: Option<&[String]>,
        days: u32,
    ) -> Result<Vec<NewsItem>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(symbol, sources, days).await {
                Ok(parsed) => {
                    validate_feed(&parsed, symbol)?;
                    return Ok(parsed.items);
                }
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, symbol, ?backoff, error = %err, "news fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

fn validate_feed(feed: &NewsFeedResponse, expected_symbol: &str) -> Result<()> {
    anyhow::ensure!(
        feed.symbol.eq_ignore_ascii_case(expected_symbol),
        "news provider symbol mismatch: expected {expected_symbol}, got {}",
        feed.symbol
    );
    for item in &feed.items {
        anyhow::ensure!(!item.title.trim().is_empty(), "news title must be non-empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_feed_with_optional_fields_missing() {
        let v = json!({
            "symbol": "AAPL",
            "items": [
                {"title": "Apple beats", "content": "Strong quarter"},
                {"title": "Supply", "content": "", "source": "wire", "published_at": "2026-10-01T12:00:00Z"}
            ]
        });
        let feed: NewsFeedResponse = serde_json::from_value(v).unwrap();
        assert_eq!(feed.items.len(), 2);
        assert!(feed.items[0].source.is_none());
        assert_eq!(feed.items[1].source.as_deref(), Some("wire"));
        assert!(validate_feed(&feed, "aapl").is_ok());
    }

    #[test]
    fn rejects_mismatched_symbol_and_blank_titles() {
        let feed = NewsFeedResponse {
            symbol: "MSFT".to_string(),
            items: vec![],
        };
        assert!(validate_feed(&feed, "AAPL").is_err());

        let feed = NewsFeedResponse {
            symbol: "AAPL".to_string(),
            items: vec![NewsItem {
                title: "  ".to_string(),
                content: "x".to_string(),
                source: None,
                published_at: None,
            }],
        };
        assert!(validate_feed(&feed, "AAPL").is_err());
    }

    #[test]
    fn url_joins_base_and_path() {
        let settings = Settings {
            news_provider_base_url: Some("http://localhost:9000/".to_string()),
            ..Settings::default()
        };
        let provider = HttpNewsProvider::from_settings(&settings).unwrap();
        assert_eq!(provider.url(), "http://localhost:9000/v1/news");
    }
}
