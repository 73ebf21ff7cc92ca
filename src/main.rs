use std::sync::Arc;

use crate::api::plans::AppState;
use crate::clients::gemini::GeminiClient;
use crate::config::{Config, PlanStoreBackend};
use crate::services::plan_generator::PlanService;
use crate::services::plan_store::MemoryPlanStore;

mod api;
mod clients;
mod config;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let gemini_client = GeminiClient::new(&config)?;
    let mut plan_service = PlanService::new(gemini_client);
    if config.plan_store == PlanStoreBackend::Memory {
        plan_service = plan_service.with_store(Arc::new(MemoryPlanStore::new()));
    }

    let state = AppState {
        config: config.clone(),
        plan_service,
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(
        port = %config.port,
        environment = ?config.environment,
        plan_store = ?config.plan_store,
        "server.listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
