use crate::ingest::provider::NewsProvider;
use crate::ingest::types::NewsItem;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::path::Path;

/// News held in memory, optionally loaded from a JSON file shaped `{"SYMBOL": [NewsItem, ..]}`.
///
/// `days` drops items with a `published_at` older than the window; undated items always pass.
/// `sources` keeps only items whose source matches case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticNewsProvider {
    items: HashMap<String, Vec<NewsItem>>,
}

impl StaticNewsProvider {
    pub fn new(items: HashMap<String, Vec<NewsItem>>) -> Self {
        let items = items
            .into_iter()
            .map(|(symbol, news)| (symbol.trim().to_ascii_uppercase(), news))
            .collect();
        Self { items }
    }

    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read news fixtures {}", path.display()))?;
        let items = serde_json::from_str::<HashMap<String, Vec<NewsItem>>>(&text)
            .with_context(|| format!("news fixtures {} are not valid JSON", path.display()))?;
        Ok(Self::new(items))
    }
}

#[async_trait::async_trait]
impl NewsProvider for StaticNewsProvider {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_news(
        &self,
        symbol: &str,
        sources: Option<&[String]>,
        days: u32,
    ) -> Result<Vec<NewsItem>> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let sources = sources.filter(|s| !s.is_empty());

        let items = self
            .items
            .get(&symbol.to_ascii_uppercase())
            .map(|news| {
                news.iter()
                    .filter(|n| n.published_at.map_or(true, |at| at >= cutoff))
                    .filter(|n| match (sources, n.source.as_deref()) {
                        (None, _) => true,
                        (Some(wanted), Some(src)) => wanted.iter().any(|w| w.eq_ignore_ascii_case(src)),
                        (Some(_), None) => false,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(items)
    }
}
