//! Application setup and initialization
//!
//! All initialization logic extracted from main.rs for better organization
//! and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use smartcv_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let (storage, backup_storage) = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, pool, storage, backup_storage)?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
