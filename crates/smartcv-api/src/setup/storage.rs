//! Storage backend setup

use anyhow::{Context, Result};
use smartcv_core::Config;
use smartcv_storage::{create_backup_storage, create_storage, Storage};
use std::sync::Arc;

/// Create the primary and backup storage backends.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize primary storage")?;
    tracing::info!(backend = %storage.backend_type(), "Primary storage initialized");

    let backup_storage =
        create_backup_storage(config).context("Failed to initialize backup storage")?;
    tracing::info!(bucket = %config.backup_bucket, "Backup storage initialized");

    Ok((storage, backup_storage))
}
