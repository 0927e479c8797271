//! Service and repository initialization

use crate::state::AppState;
use anyhow::{Context, Result};
use smartcv_core::Config;
use smartcv_db::{DocumentRecords, DocumentRepository};
use smartcv_enhance::create_enhancer;
use smartcv_services::{BackupCoordinator, UploadPipeline};
use smartcv_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Build the repositories, the enhancer, the backup coordinator (spawning
/// its worker and sweeper), and the upload pipeline.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    backup_storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let records: Arc<dyn DocumentRecords> = Arc::new(DocumentRepository::new(pool.clone()));

    let enhancer =
        create_enhancer(config).context("Failed to initialize enhancement provider")?;
    tracing::info!(provider = %config.enhancement_provider, "Enhancement provider initialized");

    let backup = Arc::new(BackupCoordinator::new(
        records.clone(),
        storage.clone(),
        backup_storage,
    ));
    let (backup_trigger, _handles) = backup.clone().start(
        config.backup_queue_capacity,
        Duration::from_secs(config.backup_sweep_interval_secs),
    );
    tracing::info!(
        queue_capacity = config.backup_queue_capacity,
        sweep_interval_secs = config.backup_sweep_interval_secs,
        "Backup coordinator started"
    );

    let pipeline = UploadPipeline::new(
        records.clone(),
        storage.clone(),
        enhancer,
        backup_trigger,
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        records,
        storage,
        pipeline,
        backup,
    }))
}
