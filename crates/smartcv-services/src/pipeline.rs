//! The upload pipeline: store bytes, persist the record, extract text,
//! enhance, persist the analysis, queue the backup.
//!
//! Steps run sequentially. Once the document row exists it is never rolled
//! back: an extraction or enhancement failure leaves the row unenhanced and
//! surfaces the error to the caller.

use chrono::Utc;
use smartcv_core::models::{Document, EnhancedCv};
use smartcv_core::{validation, AppError};
use smartcv_db::{DocumentRecords, NewDocument};
use smartcv_enhance::{EnhanceRequest, Enhancer};
use smartcv_processing::TextExtractor;
use smartcv_storage::Storage;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A file received from a client, already validated by the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// The result of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedUpload {
    pub document: Document,
    pub enhanced: EnhancedCv,
}

pub struct UploadPipeline {
    records: Arc<dyn DocumentRecords>,
    storage: Arc<dyn Storage>,
    extractor: TextExtractor,
    enhancer: Arc<dyn Enhancer>,
    backup_trigger: mpsc::Sender<Uuid>,
}

impl UploadPipeline {
    pub fn new(
        records: Arc<dyn DocumentRecords>,
        storage: Arc<dyn Storage>,
        enhancer: Arc<dyn Enhancer>,
        backup_trigger: mpsc::Sender<Uuid>,
    ) -> Self {
        Self {
            records,
            storage,
            extractor: TextExtractor::new(),
            enhancer,
            backup_trigger,
        }
    }

    /// Run the full pipeline for one upload.
    #[tracing::instrument(skip(self, upload), fields(user_id = %user_id, file = %upload.file_name))]
    pub async fn process(
        &self,
        user_id: Uuid,
        upload: UploadedFile,
    ) -> Result<ProcessedUpload, AppError> {
        let uploaded_at = Utc::now();
        let stored_name =
            validation::unique_filename(&upload.file_name, uploaded_at.timestamp_millis());

        let (storage_key, file_url) = self
            .storage
            .upload(
                user_id,
                &stored_name,
                &upload.content_type,
                upload.data.clone(),
            )
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::info!(key = %storage_key, size = upload.data.len(), "Stored uploaded document");

        let document = match self
            .records
            .insert(NewDocument {
                user_id,
                file_name: stored_name,
                original_filename: upload.file_name.clone(),
                file_url,
                file_type: upload.content_type.clone(),
                uploaded_at,
            })
            .await
        {
            Ok(document) => document,
            Err(e) => {
                // The stored object has no record pointing at it now. Leave
                // it in place and flag it for operators.
                tracing::error!(
                    key = %storage_key,
                    error = %e,
                    "Document insert failed after upload, stored object is orphaned"
                );
                return Err(e);
            }
        };

        let cv_text = self
            .extractor
            .extract(&upload.data, &upload.content_type)
            .map_err(|e| {
                tracing::warn!(
                    document_id = %document.id,
                    error = %e,
                    "Text extraction failed, document kept without analysis"
                );
                AppError::from(e)
            })?;

        let enhanced = self
            .enhancer
            .enhance(&EnhanceRequest {
                document_id: document.id,
                cv_text,
                pdf: upload.data,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    document_id = %document.id,
                    provider = %self.enhancer.provider(),
                    error = %e,
                    "Enhancement failed, document kept without analysis"
                );
                AppError::from(e)
            })?;

        let analysis = serde_json::to_value(&enhanced)
            .map_err(|e| AppError::Internal(format!("Failed to serialize analysis: {}", e)))?;
        self.records
            .update_analysis(document.id, analysis.clone())
            .await?;

        // Best effort. The periodic sweep picks up anything dropped here.
        if let Err(e) = self.backup_trigger.try_send(document.id) {
            tracing::warn!(
                document_id = %document.id,
                error = %e,
                "Backup trigger not queued, sweep will pick the document up"
            );
        }

        let mut document = document;
        document.analysis_json = Some(analysis);

        tracing::info!(document_id = %document.id, "Upload pipeline completed");

        Ok(ProcessedUpload { document, enhanced })
    }

    /// Delete a document the user owns: stored bytes first, then the record.
    #[tracing::instrument(skip(self), fields(user_id = %user_id, document_id = %document_id))]
    pub async fn delete(&self, user_id: Uuid, document_id: Uuid) -> Result<(), AppError> {
        let document = self
            .records
            .get_for_user(user_id, document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", document_id)))?;

        let key = document.storage_key();
        self.storage
            .delete(&key)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.records.delete(document_id).await?;

        tracing::info!(key = %key, "Document deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_test_pdf, FailingStorage, InMemoryRecords, StubEnhancer};
    use smartcv_storage::LocalStorage;
    use tempfile::TempDir;

    async fn build_pipeline(
        enhancer: StubEnhancer,
    ) -> (
        UploadPipeline,
        Arc<InMemoryRecords>,
        mpsc::Receiver<Uuid>,
        TempDir,
    ) {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "http://localhost:8080".to_string())
            .await
            .unwrap();
        let records = Arc::new(InMemoryRecords::new());
        let (tx, rx) = mpsc::channel(8);
        let pipeline = UploadPipeline::new(
            records.clone(),
            Arc::new(storage),
            Arc::new(enhancer),
            tx,
        );
        (pipeline, records, rx, tmp)
    }

    fn pdf_upload() -> UploadedFile {
        UploadedFile {
            file_name: "My Resume.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: make_test_pdf("Jane Doe, software engineer with ten years of experience"),
        }
    }

    #[tokio::test]
    async fn test_process_stores_persists_and_queues_backup() {
        let (pipeline, records, mut backup_rx, _tmp) =
            build_pipeline(StubEnhancer::succeeding()).await;
        let user_id = Uuid::new_v4();

        let result = pipeline.process(user_id, pdf_upload()).await.unwrap();

        assert_eq!(result.document.user_id, user_id);
        assert_eq!(result.document.original_filename, "My Resume.pdf");
        assert!(result.document.file_name.ends_with("-my_resume.pdf"));
        assert!(!result.document.backed_up_to_s3);
        assert!(result.document.analysis_json.is_some());
        assert_eq!(result.enhanced.personal_info.name.as_deref(), Some("Jane"));

        let stored = records.get_by_id(result.document.id).await.unwrap().unwrap();
        assert!(stored.analysis_json.is_some());

        assert_eq!(backup_rx.recv().await, Some(result.document.id));
    }

    #[tokio::test]
    async fn test_storage_failure_aborts_with_no_persisted_trace() {
        let records = Arc::new(InMemoryRecords::new());
        let (tx, mut backup_rx) = mpsc::channel(8);
        let pipeline = UploadPipeline::new(
            records.clone(),
            Arc::new(FailingStorage),
            Arc::new(StubEnhancer::succeeding()),
            tx,
        );

        let err = pipeline
            .process(Uuid::new_v4(), pdf_upload())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        // Nothing was written before the failure, so nothing remains.
        assert!(records.all().await.is_empty());
        assert!(backup_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unparseable_provider_output_persists_fallback_analysis() {
        let (pipeline, records, _backup_rx, _tmp) =
            build_pipeline(StubEnhancer::unparseable()).await;

        let result = pipeline.process(Uuid::new_v4(), pdf_upload()).await.unwrap();
        assert!(result.enhanced.is_fallback());

        let stored = records.get_by_id(result.document.id).await.unwrap().unwrap();
        let analysis = stored.analysis_json.unwrap();
        assert_eq!(analysis["personalInfo"]["name"], "Enhanced CV");
        assert!(analysis["rawContent"]
            .as_str()
            .unwrap()
            .contains("in prose"));
    }

    #[tokio::test]
    async fn test_extraction_failure_keeps_document_row() {
        let (pipeline, records, _backup_rx, _tmp) =
            build_pipeline(StubEnhancer::succeeding()).await;

        let upload = UploadedFile {
            file_name: "broken.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: b"not a pdf at all".to_vec(),
        };

        let err = pipeline.process(Uuid::new_v4(), upload).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction { .. }));

        let rows = records.all().await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].analysis_json.is_none());
    }

    #[tokio::test]
    async fn test_enhancement_failure_keeps_document_row() {
        let (pipeline, records, _backup_rx, _tmp) = build_pipeline(StubEnhancer::failing()).await;

        let err = pipeline
            .process(Uuid::new_v4(), pdf_upload())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Enhancement(_)));

        let rows = records.all().await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].analysis_json.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_bytes_and_record() {
        let (pipeline, records, _backup_rx, _tmp) =
            build_pipeline(StubEnhancer::succeeding()).await;
        let user_id = Uuid::new_v4();

        let result = pipeline.process(user_id, pdf_upload()).await.unwrap();
        let key = result.document.storage_key();
        assert!(pipeline.storage.exists(&key).await.unwrap());

        pipeline.delete(user_id, result.document.id).await.unwrap();

        assert!(!pipeline.storage.exists(&key).await.unwrap());
        assert!(records.get_by_id(result.document.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_rejects_other_users_document() {
        let (pipeline, _records, _backup_rx, _tmp) =
            build_pipeline(StubEnhancer::succeeding()).await;

        let owner = Uuid::new_v4();
        let result = pipeline.process(owner, pdf_upload()).await.unwrap();

        let err = pipeline
            .delete(Uuid::new_v4(), result.document.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // The owner's document is untouched.
        assert!(pipeline
            .storage
            .exists(&result.document.storage_key())
            .await
            .unwrap());
    }
}
