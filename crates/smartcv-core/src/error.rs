//! Error types module
//!
//! All errors surface through the `AppError` enum, which unifies storage,
//! database, extraction, and enhancement failures. `ErrorMetadata` lets each
//! variant describe its own HTTP response characteristics so the API layer
//! stays a thin mapping.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// How a text extraction attempt failed. Each kind carries a distinct
/// user-facing message; the detail string is for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailure {
    InvalidFormat,
    PasswordProtected,
    NoReadableText,
    Unknown,
}

impl ExtractionFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractionFailure::InvalidFormat => {
                "The file does not appear to be a valid PDF document"
            }
            ExtractionFailure::PasswordProtected => {
                "The PDF is password-protected; please upload an unprotected copy"
            }
            ExtractionFailure::NoReadableText => {
                "No readable text was found in the PDF; it may be image-only or corrupted"
            }
            ExtractionFailure::Unknown => "The PDF could not be processed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Extraction error ({kind:?}): {detail}")]
    Extraction {
        kind: ExtractionFailure,
        detail: String,
    },

    #[error("Enhancement error: {0}")]
    Enhancement(String),

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata per variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Extraction { kind, .. } => {
            let code = match kind {
                ExtractionFailure::InvalidFormat => "EXTRACTION_INVALID_FORMAT",
                ExtractionFailure::PasswordProtected => "EXTRACTION_PASSWORD_PROTECTED",
                ExtractionFailure::NoReadableText => "EXTRACTION_NO_READABLE_TEXT",
                ExtractionFailure::Unknown => "EXTRACTION_FAILED",
            };
            (
                422,
                code,
                false,
                Some("Upload a different PDF file"),
                false,
                LogLevel::Warn,
            )
        }
        AppError::Enhancement(_) => (
            502,
            "ENHANCEMENT_ERROR",
            true,
            Some("Retry after a short delay; the upload itself was stored"),
            true,
            LogLevel::Error,
        ),
        AppError::Backup(_) => (
            500,
            "BACKUP_ERROR",
            true,
            Some("The periodic sweep will retry automatically"),
            true,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Check authentication token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Extraction { .. } => "Extraction",
            AppError::Enhancement(_) => "Enhancement",
            AppError::Backup(_) => "Backup",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Detailed message including the source error chain, for logs.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to store or fetch the file".to_string(),
            AppError::Extraction { kind, .. } => kind.user_message().to_string(),
            AppError::Enhancement(_) => {
                "The AI enhancement service is currently unavailable".to_string()
            }
            AppError::Backup(_) => "Backup failed; it will be retried".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_storage() {
        let err = AppError::Storage("connection refused".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to store or fetch the file");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Document not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Document not found");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_extraction_kinds_map_to_distinct_codes_and_messages() {
        let kinds = [
            ExtractionFailure::InvalidFormat,
            ExtractionFailure::PasswordProtected,
            ExtractionFailure::NoReadableText,
            ExtractionFailure::Unknown,
        ];
        let mut codes = std::collections::HashSet::new();
        let mut messages = std::collections::HashSet::new();
        for kind in kinds {
            let err = AppError::Extraction {
                kind,
                detail: "detail".to_string(),
            };
            assert_eq!(err.http_status_code(), 422);
            codes.insert(err.error_code());
            messages.insert(err.client_message());
        }
        assert_eq!(codes.len(), 4);
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn test_backup_error_is_retryable_and_not_client_fatal() {
        let err = AppError::Backup("put failed".to_string());
        assert!(err.is_recoverable());
        assert_eq!(
            err.suggested_action(),
            Some("The periodic sweep will retry automatically")
        );
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let err = AppError::Unauthorized("Missing bearer token".to_string());
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert_eq!(err.client_message(), "Missing bearer token");
    }
}
