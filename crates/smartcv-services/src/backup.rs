//! Background backup of stored documents to the secondary bucket.
//!
//! Two paths feed the coordinator: a channel the upload pipeline pushes
//! document ids into right after a successful run, and a periodic sweep
//! over every row still flagged `backed_up_to_s3 = false`. Backup keys are
//! deterministic, so the two paths overlapping is harmless.

use smartcv_core::AppError;
use smartcv_db::DocumentRecords;
use smartcv_storage::{keys, Storage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Outcome of backing up a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Bytes copied to the backup bucket under the returned key.
    Completed { s3_key: String },
    /// The document was already flagged as backed up. No work done.
    AlreadyBackedUp,
}

/// Per-document result of a sweep run.
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub document_id: Uuid,
    pub success: bool,
    pub s3_key: Option<String>,
    pub error: Option<String>,
}

pub struct BackupCoordinator {
    records: Arc<dyn DocumentRecords>,
    primary: Arc<dyn Storage>,
    backup: Arc<dyn Storage>,
}

impl BackupCoordinator {
    pub fn new(
        records: Arc<dyn DocumentRecords>,
        primary: Arc<dyn Storage>,
        backup: Arc<dyn Storage>,
    ) -> Self {
        Self {
            records,
            primary,
            backup,
        }
    }

    /// Copy one document's bytes to the backup bucket and flag the row.
    ///
    /// Already-flagged documents are a no-op. A flag update that fails after
    /// the copy succeeded is logged and not reversed; the next sweep redoes
    /// the copy under the same key.
    #[tracing::instrument(skip(self), fields(document_id = %document_id))]
    pub async fn backup_one(&self, document_id: Uuid) -> Result<BackupOutcome, AppError> {
        let document = self
            .records
            .get_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", document_id)))?;

        if document.backed_up_to_s3 {
            tracing::debug!("Document already backed up, skipping");
            return Ok(BackupOutcome::AlreadyBackedUp);
        }

        let primary_key = document.storage_key();
        let data = self.primary.download(&primary_key).await.map_err(|e| {
            AppError::Backup(format!(
                "Failed to download {} from primary storage: {}",
                primary_key, e
            ))
        })?;

        let backup_key = keys::backup_key(document.id, &primary_key);
        self.backup
            .upload_with_key(&backup_key, data, &document.file_type)
            .await
            .map_err(|e| {
                AppError::Backup(format!("Failed to upload {}: {}", backup_key, e))
            })?;

        if let Err(e) = self.records.mark_backed_up(document.id, &backup_key).await {
            tracing::error!(
                key = %backup_key,
                error = %e,
                "Backup copy succeeded but the flag update failed, sweep will retry"
            );
        } else {
            tracing::info!(key = %backup_key, "Document backed up");
        }

        Ok(BackupOutcome::Completed { s3_key: backup_key })
    }

    /// Back up every document still pending. One failing document never
    /// stops the rest; each gets its own report.
    pub async fn sweep_pending(&self) -> Vec<BackupReport> {
        let pending = match self.records.list_pending_backup().await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list documents pending backup");
                return Vec::new();
            }
        };

        tracing::info!(count = pending.len(), "Backup sweep started");

        let mut reports = Vec::with_capacity(pending.len());
        for document in pending {
            let report = match self.backup_one(document.id).await {
                Ok(BackupOutcome::Completed { s3_key }) => BackupReport {
                    document_id: document.id,
                    success: true,
                    s3_key: Some(s3_key),
                    error: None,
                },
                Ok(BackupOutcome::AlreadyBackedUp) => BackupReport {
                    document_id: document.id,
                    success: true,
                    s3_key: document.s3_key.clone(),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(document_id = %document.id, error = %e, "Backup failed");
                    BackupReport {
                        document_id: document.id,
                        success: false,
                        s3_key: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            reports.push(report);
        }

        let failed = reports.iter().filter(|r| !r.success).count();
        tracing::info!(
            total = reports.len(),
            failed = failed,
            "Backup sweep finished"
        );

        reports
    }

    /// Spawn the background workers: one draining the trigger channel, one
    /// sweeping on an interval. Returns the trigger sender for the pipeline
    /// and the task handles.
    pub fn start(
        self: Arc<Self>,
        queue_capacity: usize,
        sweep_interval: Duration,
    ) -> (mpsc::Sender<Uuid>, Vec<JoinHandle<()>>) {
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<Uuid>(queue_capacity);

        let worker = {
            let coordinator = self.clone();
            tokio::spawn(async move {
                tracing::info!("Backup worker started");
                while let Some(document_id) = trigger_rx.recv().await {
                    if let Err(e) = coordinator.backup_one(document_id).await {
                        tracing::warn!(
                            document_id = %document_id,
                            error = %e,
                            "Triggered backup failed, sweep will retry"
                        );
                    }
                }
                tracing::info!("Backup worker stopped");
            })
        };

        let sweeper = tokio::spawn(async move {
            tracing::info!(interval_secs = sweep_interval.as_secs(), "Backup sweeper started");
            let mut interval = tokio::time::interval(sweep_interval);
            loop {
                interval.tick().await;
                self.sweep_pending().await;
            }
        });

        (trigger_tx, vec![worker, sweeper])
    }
}
