//! HTTP server for the parley conversational-message service.

mod config;
mod db;
mod inference;
mod routes;
mod state;

use crate::config::{ServerConfig, StartupConfig};
use crate::db::PgMessageStore;
use crate::inference::{LlmReplyGenerator, ZeroShotDialogClassifier};
use crate::state::AppState;
use parley_ai::{OpenAiBackend, OpenAiConfig, ZeroShotClient, ZeroShotConfig};
use parley_conversation::{PredictionFlow, ReplyFlow, ReplyGenerator};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Polls the database until it accepts connections, bounded by the
/// startup configuration. Readiness is operational, outside the
/// pipeline: the core assumes a ready store.
async fn wait_for_database(url: &str, startup: &StartupConfig, max_connections: u32) -> PgPool {
    let mut attempt = 1;
    loop {
        match PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(e) if attempt < startup.max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = startup.max_attempts,
                    error = %e,
                    "Waiting for PostgreSQL to become available..."
                );
                tokio::time::sleep(Duration::from_secs(startup.retry_interval_seconds)).await;
                attempt += 1;
            }
            Err(e) => {
                panic!(
                    "database not reachable after {} attempts: {e}",
                    startup.max_attempts
                );
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    // Wait for the database, then run migrations
    let db_pool = wait_for_database(
        &config.database.connect_url(),
        &config.startup,
        config.database.max_connections,
    )
    .await;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    let store = PgMessageStore::new(db_pool);

    // Reply generation is optional; without it the flow answers with the
    // fixed fallback reply.
    let reply_flow = match &config.llm {
        Some(llm) => {
            let backend = OpenAiBackend::new(OpenAiConfig {
                base_url: llm.base_url.clone(),
                api_key: llm.api_key.clone(),
                model: llm.model.clone(),
                timeout: Duration::from_secs(llm.timeout_seconds),
            })
            .expect("failed to build LLM backend");
            tracing::info!(model = %llm.model, "Reply generation enabled");
            let generator: Arc<dyn ReplyGenerator> = Arc::new(LlmReplyGenerator::new(backend));
            ReplyFlow::new(store.clone(), generator)
        }
        None => {
            tracing::warn!("No LLM configured, replies will use the fallback text");
            ReplyFlow::without_generator(store.clone())
        }
    };

    let classifier_client = ZeroShotClient::new(ZeroShotConfig {
        endpoint: config.classifier.endpoint.clone(),
        api_key: config.classifier.api_key.clone(),
        timeout: Duration::from_secs(config.classifier.timeout_seconds),
    })
    .expect("failed to build classifier client");
    let prediction_flow = PredictionFlow::new(
        store,
        Arc::new(ZeroShotDialogClassifier::new(classifier_client)),
    );

    let app_state = AppState {
        reply_flow: Arc::new(reply_flow),
        prediction_flow: Arc::new(prediction_flow),
    };

    let app = routes::router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
