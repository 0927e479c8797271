use crate::{LocalStorage, S3Storage, Storage, StorageBackend, StorageError, StorageResult};
use smartcv_core::Config;
use std::sync::Arc;

/// Create the primary storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend.unwrap_or(StorageBackend::S3);

    match backend {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint.clone();

            let storage = S3Storage::new(bucket, region, endpoint)?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }
    }
}

/// Create the secondary (backup) storage backend.
///
/// Backups always target S3; the bucket has a default so the coordinator
/// can run unconfigured in development against a dedicated bucket name.
pub fn create_backup_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let region = config.backup_region.clone().ok_or_else(|| {
        StorageError::ConfigError("BACKUP_S3_REGION or AWS_REGION not configured".to_string())
    })?;

    let storage = S3Storage::new(
        config.backup_bucket.clone(),
        region,
        config.backup_endpoint.clone(),
    )?;
    Ok(Arc::new(storage))
}
