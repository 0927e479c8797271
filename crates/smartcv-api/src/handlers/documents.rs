use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse},
    Json,
};
use smartcv_core::models::{DocumentResponse, EnhancedCv};
use smartcv_core::AppError;
use smartcv_db::DocumentRecords;
use smartcv_processing::render_cv;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v0/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Caller's documents, newest first", body = Vec<DocumentResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let documents = state.records.list_for_user(user.user_id).await?;
    let responses: Vec<DocumentResponse> =
        documents.into_iter().map(DocumentResponse::from).collect();
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .records
        .get_for_user(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    Ok(Json(DocumentResponse::from(document)))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/render",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Rendered HTML", content_type = "text/html"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found or has no analysis", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn render_document(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .records
        .get_for_user(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let analysis = document
        .analysis_json
        .ok_or_else(|| AppError::NotFound("Document has no analysis".to_string()))?;

    let cv: EnhancedCv = serde_json::from_value(analysis)
        .map_err(|e| AppError::Internal(format!("Stored analysis is malformed: {}", e)))?;

    Ok(Html(render_cv(&cv)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.pipeline.delete(user.user_id, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
