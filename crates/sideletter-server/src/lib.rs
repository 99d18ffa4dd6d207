//! Side Letter Server
//!
//! HTTP shell around the query pipeline: wires the Ragie retriever, the
//! OpenAI generator and the interaction log into a [`QueryOrchestrator`] and
//! serves it with axum.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::{ConfigError, ServiceConfig};
use handlers::{create_router, AppState};
use sideletter_domain::BackendError;
use sideletter_llm::{load_system_prompt, OpenAiGenerator};
use sideletter_log::InteractionLog;
use sideletter_orchestrator::QueryOrchestrator;
use sideletter_retrieval::RagieRetriever;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A backend client could not be built
    #[error("Backend setup failed: {0}")]
    Backend(#[from] BackendError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the shared state from configuration and the environment
///
/// API keys are read from `RAGIE_API_KEY` and `OPENAI_API_KEY`. A missing key
/// is not fatal: requests that need that backend fail with a configuration
/// error and `/health` reports it as not connected.
pub fn build_state(config: &ServiceConfig) -> Result<AppState, ServerError> {
    config.validate()?;

    let retriever = RagieRetriever::from_env(
        config.retrieval.base_url.as_str(),
        Duration::from_secs(config.retrieval.timeout_secs),
    )?;

    let generator = OpenAiGenerator::from_env(
        config.generation.base_url.as_str(),
        Duration::from_secs(config.generation.timeout_secs),
    )?
    .with_model(config.generation.model.as_str())
    .with_temperature(config.generation.temperature)
    .with_max_tokens(config.generation.max_tokens);

    let log = InteractionLog::new(config.log_capacity)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let log = Arc::new(log);
    let system_prompt = load_system_prompt(&config.system_prompt_path);

    let orchestrator = QueryOrchestrator::new(
        Arc::new(retriever),
        Arc::new(generator),
        log,
        system_prompt,
        config.pipeline.clone(),
    );

    if !orchestrator.retrieval_configured() {
        warn!("{} is not set; chat requests will fail", sideletter_retrieval::API_KEY_ENV);
    }
    if !orchestrator.generation_configured() {
        warn!("{} is not set; chat requests will fail", sideletter_llm::API_KEY_ENV);
    }

    Ok(AppState::new(orchestrator))
}

/// Start the HTTP server
///
/// Builds the pipeline from `config` and serves until the process exits.
pub async fn start_server(config: ServiceConfig) -> Result<(), ServerError> {
    info!("Starting Side Letter server");
    info!("Bind address: {}", config.bind_addr());
    info!("Log capacity: {}", config.log_capacity);
    info!("Generation model: {}", config.generation.model);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
