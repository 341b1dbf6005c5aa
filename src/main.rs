//! Fraud Lens Server
//!
//! Single-page demo that asks a hosted language model whether a card
//! transaction looks fraudulent.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FRAUD LENS                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │  Page +   │  │  Assessment  │  │  Model Gateway      │  │
//! │  │  JSON API │─▶│  Desk        │─▶│  (Gemini, reqwest)  │  │
//! │  │  (Axum)   │  │  (1 form)    │  │                     │  │
//! │  └───────────┘  └──────────────┘  └──────────┬──────────┘  │
//! │                                              ▼              │
//! │                               prompt ─▶ reply ─▶ parser    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod assessment;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use parking_lot::Mutex;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assessment::desk::AssessmentDesk;
use assessment::gateway::GeminiGateway;
use assessment::Assessor;

pub use error::AppResult;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fraud_lens=debug,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Fraud Lens starting ({} environment)...", config.environment);
    for setting in &config.ignored {
        tracing::warn!("Unrecognised setting {}, using default", setting);
    }
    tracing::info!(
        "Model: {} ({} convention, {} form, stale replies: {})",
        config.model,
        config.convention,
        config.form_variant,
        config.stale_responses
    );
    if !config.has_credential() {
        tracing::warn!("API_KEY is not set; submissions are disabled until it is configured");
    }

    let gateway = GeminiGateway::new(config.gateway())
        .context("Failed to create HTTP client")?;

    let state = AppState::new(config.clone(), Arc::new(gateway));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub assessor: Assessor,
    pub desk: Arc<Mutex<AssessmentDesk>>,
}

impl AppState {
    pub fn new(config: config::Config, gateway: Arc<dyn assessment::ModelGateway>) -> Self {
        let assessor = Assessor::new(gateway, config.convention);
        let desk = AssessmentDesk::new(config.stale_responses);

        Self {
            config,
            assessor,
            desk: Arc::new(Mutex::new(desk)),
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/form", get(handlers::page::form))
        .route("/api/v1/analytics", get(handlers::analytics::report))
        .route("/api/v1/assessments", post(handlers::assessments::submit))
        .route(
            "/api/v1/assessments/current",
            get(handlers::assessments::current).delete(handlers::assessments::clear),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
