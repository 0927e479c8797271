//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use smartcv_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartCV API",
        version = "0.1.0",
        description = "CV upload and AI enhancement API (v0). Upload a PDF CV, get a structured, enhanced version back, browse and render past uploads. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::upload::upload_cv,
        handlers::documents::list_documents,
        handlers::documents::get_document,
        handlers::documents::render_document,
        handlers::documents::delete_document,
        handlers::backups::backup_document,
        handlers::backups::sweep_backups,
    ),
    components(
        schemas(
            models::DocumentResponse,
            models::EnhancedCv,
            models::PersonalInfo,
            models::ExperienceEntry,
            models::EducationEntry,
            handlers::upload::UploadCvResponse,
            handlers::backups::BackupResponse,
            handlers::backups::BackupErrorResponse,
            handlers::backups::SweepReportEntry,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "cv", description = "CV upload and enhancement"),
        (name = "documents", description = "Stored document retrieval, rendering, and deletion"),
        (name = "backups", description = "Secondary-storage backup operations")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
