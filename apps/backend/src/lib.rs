pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod workspace;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::llm::LlmClient;
use crate::workspace::Workspace;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Mutex<Workspace>>,
    pub llm: Arc<LlmClient>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = LlmClient::new(config.llm.clone())?;
        Ok(Self {
            workspace: Arc::new(Mutex::new(Workspace::new(config.quiz_seed))),
            llm: Arc::new(llm),
            config: Arc::new(config),
        })
    }
}

/// Build the router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Source routes
        .route(
            "/api/sources",
            get(routes::sources::list)
                .post(routes::sources::upload)
                .delete(routes::sources::clear),
        )
        .route("/api/sources/{id}", delete(routes::sources::remove))
        // Quiz routes
        .route("/api/quiz/start", post(routes::quiz::start))
        .route("/api/quiz/current", get(routes::quiz::current))
        .route("/api/quiz/answer", post(routes::quiz::answer))
        .route("/api/quiz/result", get(routes::quiz::result))
        .route("/api/quiz/retest", post(routes::quiz::retest))
        .route("/api/quiz/restart", post(routes::quiz::restart))
        .route("/api/quiz/feedback", post(routes::quiz::feedback))
        // Hosted-model routes
        .route("/api/generate", post(routes::generate::generate))
        .route("/api/grade", post(routes::grade::grade))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.addr();
    let state = AppState::new(config)?;
    if !state.llm.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; generation and coaching are disabled");
    }
    let app = app(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(Config {
            quiz_seed: Some(1),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_state_without_key_has_no_model() {
        assert!(!test_state().llm.is_configured());

        let keyed = AppState::new(Config {
            llm: crate::config::LlmConfig {
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            },
            ..Config::default()
        })
        .unwrap();
        assert!(keyed.llm.is_configured());
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app(test_state())
            .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
