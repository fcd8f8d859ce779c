// api-gateway-rs/src/main.rs
// auto-ops: receives error reports and drives them through the remediation
// workflow. Port 3000 unless AUTO_OPS_SERVICE_ADDR / _PORT say otherwise.

use std::sync::Arc;

use api_gateway::logging::init_logging;
use api_gateway::{create_router, AppState};
use config_rs::{load_dotenv, AppConfig, EnvSource, LoggingConfig};
use incident_store_rs::open_store;
use orchestrator_service_rs::{Collaborators, Orchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // The subscriber goes in before anything else logs; `log` records from
    // config-rs reach it through the tracing-log bridge.
    let dotenv_path = load_dotenv();
    init_logging(&LoggingConfig::from_source(&EnvSource))?;
    match dotenv_path {
        Some(path) => tracing::info!("Loaded environment from {}", path.display()),
        None => tracing::debug!("No .env file found, using process environment"),
    }
    let config = AppConfig::from_env();

    let store = open_store(&config.store).await?;
    let collaborators = Collaborators::from_config(&config, store);
    let modes = collaborators.modes();
    tracing::info!(
        log_sink = ?modes.log_sink,
        plan_generator = ?modes.plan_generator,
        sandbox_tester = ?modes.sandbox_tester,
        pull_request_opener = ?modes.pull_request_opener,
        voice_summarizer = ?modes.voice_summarizer,
        "collaborators configured"
    );

    let state = Arc::new(AppState::new(Orchestrator::new(collaborators)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("auto-ops listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
