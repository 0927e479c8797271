use async_trait::async_trait;
use chrono::{DateTime, Utc};
use smartcv_core::models::Document;
use smartcv_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "id, user_id, file_name, original_filename, file_url, file_type, \
     uploaded_at, backed_up_to_s3, s3_key, analysis_json";

/// A document row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub file_name: String,
    pub original_filename: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Persistence operations on document records.
///
/// Services depend on this trait rather than the concrete repository so
/// tests can run against an in-memory implementation.
#[async_trait]
pub trait DocumentRecords: Send + Sync {
    async fn insert(&self, new: NewDocument) -> Result<Document, AppError>;

    /// Fetch a document without ownership scoping. Used by the backup
    /// coordinator, which operates across users.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Fetch a document owned by `user_id`.
    async fn get_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Document>, AppError>;

    /// List a user's documents, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Document>, AppError>;

    async fn update_analysis(
        &self,
        id: Uuid,
        analysis: serde_json::Value,
    ) -> Result<(), AppError>;

    /// Set `backed_up_to_s3 = true` and record the backup key. The flag
    /// only ever moves from false to true.
    async fn mark_backed_up(&self, id: Uuid, s3_key: &str) -> Result<(), AppError>;

    /// All documents with `backed_up_to_s3 = false`, oldest first.
    async fn list_pending_backup(&self) -> Result<Vec<Document>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Postgres-backed document repository.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRecords for DocumentRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "documents", db.operation = "insert"))]
    async fn insert(&self, new: NewDocument) -> Result<Document, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            INSERT INTO documents (user_id, file_name, original_filename, file_url, file_type, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.file_name)
        .bind(&new.original_filename)
        .bind(&new.file_url)
        .bind(&new.file_type)
        .bind(new.uploaded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn get_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY uploaded_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    #[tracing::instrument(skip(self, analysis), fields(db.table = "documents", db.operation = "update"))]
    async fn update_analysis(
        &self,
        id: Uuid,
        analysis: serde_json::Value,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE documents SET analysis_json = $2 WHERE id = $1")
            .bind(id)
            .bind(analysis)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "update"))]
    async fn mark_backed_up(&self, id: Uuid, s3_key: &str) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE documents SET backed_up_to_s3 = TRUE, s3_key = $2 WHERE id = $1")
                .bind(id)
                .bind(s3_key)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list_pending_backup(&self) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE backed_up_to_s3 = FALSE ORDER BY uploaded_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
