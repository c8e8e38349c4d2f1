use crate::analysis::round2;
use crate::domain::contract::{SentimentAnalysis, SentimentRequest, SentimentResponse};
use crate::engine::score_sentiment_batch;
use crate::ingest::provider::NewsProvider;
use chrono::Utc;
use std::sync::Arc;

const MAX_NEWS_PER_SYMBOL: usize = 5;
const DISPLAY_TEXT_CHARS: usize = 100;

#[derive(Clone)]
pub struct SentimentService {
    news: Arc<dyn NewsProvider>,
}

struct Pending {
    symbol: Option<String>,
    display: String,
    body: String,
}

impl SentimentService {
    pub fn new(news: Arc<dyn NewsProvider>) -> Self {
        Self { news }
    }

    pub async fn analyze(&self, req: SentimentRequest) -> anyhow::Result<SentimentResponse> {
        let req = req.validate_and_normalize()?;
        let days = req.date_range();
        tracing::info!(
            has_text = req.text.is_some(),
            symbols = req.symbols.as_ref().map_or(0, Vec::len),
            days,
            provider = self.news.provider_name(),
            "analyzing sentiment"
        );

        let mut pending = Vec::new();
        if let Some(text) = req.text {
            pending.push(Pending {
                symbol: None,
                display: truncate_for_display(&text),
                body: text,
            });
        }

        for symbol in req.symbols.unwrap_or_default() {
            let news = match self
                .news
                .fetch_news(&symbol, req.sources.as_deref(), days)
                .await
            {
                Ok(news) => news,
                Err(err) => {
                    tracing::warn!(%symbol, error = %err, "news fetch failed; symbol skipped");
                    continue;
                }
            };
            for item in news.into_iter().take(MAX_NEWS_PER_SYMBOL) {
                pending.push(Pending {
                    symbol: Some(symbol.clone()),
                    display: item.title,
                    body: item.content,
                });
            }
        }

        let results = score_sentiment_batch(pending.iter().map(|p| p.body.clone()).collect()).await?;

        let analysis: Vec<SentimentAnalysis> = pending
            .into_iter()
            .zip(results)
            .map(|(p, r)| SentimentAnalysis {
                symbol: p.symbol,
                text: Some(p.display),
                sentiment_score: round2(r.score),
                sentiment_label: r.label,
                key_terms: r.key_terms,
                confidence: r.confidence,
            })
            .collect();

        let overall_sentiment = if analysis.is_empty() {
            0.0
        } else {
            analysis.iter().map(|a| a.sentiment_score).sum::<f64>() / analysis.len() as f64
        };

        Ok(SentimentResponse {
            analysis,
            overall_sentiment,
            timestamp: Utc::now(),
        })
    }
}

fn truncate_for_display(text: &str) -> String {
    if text.chars().count() > DISPLAY_TEXT_CHARS {
        let head: String = text.chars().take(DISPLAY_TEXT_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
