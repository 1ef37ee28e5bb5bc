//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use imgpack_core::Config;
use imgpack_infra::LogFormat;
use std::sync::Arc;

const SERVICE_NAME: &str = "imgpack-api";

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    let log_format = match std::env::var("LOG_FORMAT") {
        Ok(value) => value.parse::<LogFormat>()?,
        Err(_) => LogFormat::default(),
    };
    imgpack_infra::init_telemetry(SERVICE_NAME, config.environment(), log_format)?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = Arc::new(AppState::new(config.clone()));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
