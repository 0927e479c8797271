//! Backup endpoints, keeping the original function contracts: a single
//! backup returns `{success, s3Key}` on 200 and `{error}` on 500; the sweep
//! returns one outcome per pending document.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use smartcv_db::DocumentRecords;
use smartcv_services::{BackupOutcome, BackupReport};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct BackupResponse {
    pub success: bool,
    #[serde(rename = "s3Key", skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BackupErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepReportEntry {
    pub document_id: Uuid,
    pub success: bool,
    #[serde(rename = "s3Key", skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<BackupReport> for SweepReportEntry {
    fn from(report: BackupReport) -> Self {
        SweepReportEntry {
            document_id: report.document_id,
            success: report.success,
            s3_key: report.s3_key,
            error: report.error,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/backups/{id}",
    tag = "backups",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document backed up", body = BackupResponse),
        (status = 500, description = "Backup failed", body = BackupErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn backup_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.backup.backup_one(id).await {
        Ok(BackupOutcome::Completed { s3_key }) => (
            StatusCode::OK,
            Json(BackupResponse {
                success: true,
                s3_key: Some(s3_key),
            }),
        )
            .into_response(),
        Ok(BackupOutcome::AlreadyBackedUp) => {
            let s3_key = match state.records.get_by_id(id).await {
                Ok(Some(document)) => document.s3_key,
                _ => None,
            };
            (StatusCode::OK, Json(BackupResponse { success: true, s3_key })).into_response()
        }
        Err(e) => {
            tracing::error!(document_id = %id, error = %e, "Backup request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BackupErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/backups/sweep",
    tag = "backups",
    responses(
        (status = 200, description = "Per-document sweep outcomes", body = Vec<SweepReportEntry>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn sweep_backups(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let reports = state.backup.sweep_pending().await;
    let entries: Vec<SweepReportEntry> = reports.into_iter().map(SweepReportEntry::from).collect();
    Json(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_response_uses_s3_key_casing() {
        let json = serde_json::to_value(BackupResponse {
            success: true,
            s3_key: Some("backups/abc/cv.pdf".to_string()),
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["s3Key"], "backups/abc/cv.pdf");
    }

    #[test]
    fn test_sweep_entry_omits_empty_fields() {
        let entry = SweepReportEntry {
            document_id: Uuid::new_v4(),
            success: true,
            s3_key: None,
            error: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("s3Key").is_none());
        assert!(json.get("error").is_none());
        assert!(json.get("documentId").is_some());
    }
}
