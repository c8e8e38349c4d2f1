use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use investiq_core::config::Settings;
use investiq_core::domain::contract::{
    RecommendationResponse, SentimentRequest, SentimentResponse, UserProfile,
};
use investiq_core::service::{RecommendationService, SentimentService};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState::from_settings(&settings)?;
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port()));
    tracing::info!(%addr, "InvestIQ ML API listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    recommendations: RecommendationService,
    sentiment: SentimentService,
}

impl AppState {
    fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            recommendations: RecommendationService::new(
                investiq_core::providers::price_provider(settings),
                settings.history_days(),
            ),
            sentiment: SentimentService::new(investiq_core::providers::news_provider(settings)?),
        })
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .route("/news-sentiment", post(news_sentiment))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({"message": "InvestIQ ML API is running"}))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: Utc::now(),
        version: VERSION,
    })
}

async fn recommend(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    state
        .recommendations
        .generate(profile)
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to generate recommendations", e))
}

async fn news_sentiment(
    State(state): State<AppState>,
    Json(req): Json<SentimentRequest>,
) -> Result<Json<SentimentResponse>, ApiError> {
    state
        .sentiment
        .analyze(req)
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to analyze sentiment", e))
}

struct ApiError {
    context: &'static str,
    error: anyhow::Error,
}

impl ApiError {
    fn new(context: &'static str, error: anyhow::Error) -> Self {
        Self { context, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        sentry_anyhow::capture_anyhow(&self.error);
        tracing::error!(error = %self.error, "{}", self.context);
        let body = json!({"detail": format!("{}: {:#}", self.context, self.error)});
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
    use axum::body::Body;
    use axum::http::Request;
    use investiq_core::ingest::news::StaticNewsProvider;
    use investiq_core::ingest::synthetic::SyntheticPriceProvider;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        router(AppState {
            recommendations: RecommendationService::new(
                Arc::new(SyntheticPriceProvider::new(Some(3))),
                30,
            ),
            sentiment: SentimentService::new(Arc::new(StaticNewsProvider::default())),
        })
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let res = test_app()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_version() {
        let res = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["status"], "healthy");
        assert_eq!(v["version"], VERSION);
    }

    #[tokio::test]
    async fn recommend_returns_profile_sized_list() {
        let (status, v) = post_json(
            "/recommend",
            json!({"risk_tolerance": "conservative", "budget": 5000, "time_horizon": "long"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let recs = v["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 3);
        assert!(recs[0]["suggested_allocation"].as_f64().is_some());
    }

    #[tokio::test]
    async fn recommend_maps_failures_to_500_detail() {
        let (status, v) = post_json(
            "/recommend",
            json!({"risk_tolerance": "moderate", "budget": -10, "time_horizon": "short"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(v["detail"]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate recommendations"));
    }

    #[tokio::test]
    async fn news_sentiment_scores_direct_text() {
        let (status, v) = post_json(
            "/news-sentiment",
            json!({"text": "Strong earnings beat forecast, outlook bullish"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["analysis"][0]["sentiment_label"], "positive");
        assert_eq!(v["analysis"][0]["sentiment_score"], 1.0);
        assert_eq!(v["overall_sentiment"], 1.0);
    }
}
