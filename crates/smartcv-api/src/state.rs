//! Application state shared across handlers.

use smartcv_core::Config;
use smartcv_db::DocumentRecords;
use smartcv_services::{BackupCoordinator, UploadPipeline};
use smartcv_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub records: Arc<dyn DocumentRecords>,
    pub storage: Arc<dyn Storage>,
    pub pipeline: UploadPipeline,
    pub backup: Arc<BackupCoordinator>,
}
