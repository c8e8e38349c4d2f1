use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use investiq_core::config::Settings;
use investiq_core::domain::contract::{SentimentRequest, UserProfile};
use investiq_core::domain::profile::{RiskProfile, TimeHorizon};
use investiq_core::service::{RecommendationService, SentimentService};

#[derive(Debug, Parser)]
#[command(name = "investiq_worker")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score the profile's universe on synthetic history and print the ranked allocation.
    Recommend {
        /// conservative, moderate or aggressive. Anything else is treated as moderate.
        #[arg(long, default_value = "moderate")]
        risk: String,

        /// short, medium or long.
        #[arg(long, default_value = "medium")]
        horizon: String,

        #[arg(long, default_value_t = 10_000.0)]
        budget: f64,

        /// Any value narrows the universe to its first five symbols.
        #[arg(long = "sector")]
        sectors: Vec<String>,

        #[arg(long = "exclude")]
        exclusions: Vec<String>,

        /// Seed for reproducible synthetic history. Overrides SYNTHETIC_SEED.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score free text and/or recent news for symbols.
    Sentiment {
        #[arg(long)]
        text: Option<String>,

        #[arg(long = "symbol")]
        symbols: Vec<String>,

        #[arg(long = "source")]
        sources: Vec<String>,

        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(args.command, &mut settings).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "worker run failed");
    }
    result
}

async fn run(command: Command, settings: &mut Settings) -> anyhow::Result<()> {
    let output = match command {
        Command::Recommend {
            risk,
            horizon,
            budget,
            sectors,
            exclusions,
            seed,
        } => {
            if seed.is_some() {
                settings.synthetic_seed = seed;
            }
            let service = RecommendationService::new(
                investiq_core::providers::price_provider(settings),
                settings.history_days(),
            );
            let profile = UserProfile {
                risk_tolerance: RiskProfile::parse(&risk),
                budget,
                time_horizon: TimeHorizon::parse(&horizon),
                sector_preferences: Some(sectors),
                exclusions: Some(exclusions),
            };
            let res = service.generate(profile).await?;
            tracing::info!(
                recommendations = res.recommendations.len(),
                skipped = res.skipped.len(),
                "recommendation run complete"
            );
            serde_json::to_string_pretty(&res)?
        }
        Command::Sentiment {
            text,
            symbols,
            sources,
            days,
        } => {
            anyhow::ensure!(
                text.is_some() || !symbols.is_empty(),
                "provide --text and/or at least one --symbol"
            );
            let service = SentimentService::new(investiq_core::providers::news_provider(settings)?);
            let req = SentimentRequest {
                text,
                symbols: Some(symbols),
                sources: Some(sources),
                date_range: Some(days),
            };
            let res = service.analyze(req).await?;
            serde_json::to_string_pretty(&res).context("failed to serialize sentiment response")?
        }
    };

    println!("{output}");
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recommend_flags() {
        let args = Args::try_parse_from([
            "investiq_worker",
            "recommend",
            "--risk",
            "aggressive",
            "--exclude",
            "TSLA",
            "--exclude",
            "AMD",
            "--seed",
            "9",
        ])
        .unwrap();
        match args.command {
            Command::Recommend {
                risk,
                horizon,
                exclusions,
                seed,
                ..
            } => {
                assert_eq!(risk, "aggressive");
                assert_eq!(horizon, "medium");
                assert_eq!(exclusions, ["TSLA", "AMD"]);
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sentiment_requires_input() {
        let mut settings = Settings::default();
        let err = run(
            Command::Sentiment {
                text: None,
                symbols: vec![],
                sources: vec![],
                days: 7,
            },
            &mut settings,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("--text"));
    }
}
