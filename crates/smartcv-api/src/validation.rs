//! Upload validation: multipart extraction, size and type checks.

use axum::extract::Multipart;
use smartcv_core::AppError;

/// A file pulled out of a multipart request.
pub struct MultipartFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Read the single `file` field out of a multipart body.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<MultipartFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::InvalidInput("Missing filename".to_string()))?;
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?
            .to_vec();

        return Ok(MultipartFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(AppError::InvalidInput(
        "Missing 'file' field in multipart body".to_string(),
    ))
}

pub fn validate_file_size(size: usize, max: usize) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    if size > max {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            size, max
        )));
    }
    Ok(())
}

pub fn validate_extension(file_name: &str, allowed: &[String]) -> Result<(), AppError> {
    let extension = file_name
        .rsplit('.')
        .next()
        .filter(|ext| *ext != file_name)
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Missing file extension (filename: {})", file_name))
        })?;

    if !allowed.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid extension '{}', allowed: {:?}",
            extension, allowed
        )));
    }
    Ok(())
}

pub fn validate_content_type(content_type: &str, allowed: &[String]) -> Result<(), AppError> {
    // Strip any parameters like "; charset=utf-8"
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase();

    if !allowed.contains(&mime) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type '{}', allowed: {:?}",
            content_type, allowed
        )));
    }
    Ok(())
}
