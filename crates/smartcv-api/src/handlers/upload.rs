use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::{
    extract_multipart_file, validate_content_type, validate_extension, validate_file_size,
};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use smartcv_core::models::{DocumentResponse, EnhancedCv};
use smartcv_services::UploadedFile;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadCvResponse {
    pub document: DocumentResponse,
    pub analysis: EnhancedCv,
}

#[utoipa::path(
    post,
    path = "/api/v0/cv",
    tag = "cv",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "CV uploaded and enhanced", body = UploadCvResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Text extraction failed", body = ErrorResponse),
        (status = 502, description = "Enhancement provider failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_cv(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;

    validate_file_size(file.data.len(), state.config.max_document_size_bytes)?;
    validate_extension(&file.file_name, &state.config.document_allowed_extensions)?;
    validate_content_type(
        &file.content_type,
        &state.config.document_allowed_content_types,
    )?;

    let processed = state
        .pipeline
        .process(
            user.user_id,
            UploadedFile {
                file_name: file.file_name,
                content_type: file.content_type,
                data: file.data,
            },
        )
        .await?;

    Ok(Json(UploadCvResponse {
        document: DocumentResponse::from(processed.document),
        analysis: processed.enhanced,
    }))
}
