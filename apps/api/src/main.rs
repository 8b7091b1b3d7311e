use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_api::config::Config;
use interview_api::db::create_pool;
use interview_api::llm_client::{self, LlmClient};
use interview_api::routes::build_router;
use interview_api::scoring::evaluator::AnswerEvaluator;
use interview_api::scoring::store::{AnswerStore, MemoryAnswerStore, PgAnswerStore};
use interview_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("interview_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the ideal-answer store
    let store: Arc<dyn AnswerStore> = match &config.database_url {
        Some(url) => Arc::new(PgAnswerStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; ideal answers are kept in memory only");
            Arc::new(MemoryAnswerStore::new())
        }
    };

    // Initialize completion client
    let llm = LlmClient::new(config.openai_api_key.clone())?;
    info!("Completion client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        evaluator: AnswerEvaluator::new(Arc::new(llm), store),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the interview client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
