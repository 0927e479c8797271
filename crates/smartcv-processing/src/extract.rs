//! PDF text extraction.
//!
//! Extraction runs page by page so a single damaged page does not lose the
//! rest of the document. Failures are classified into the variants below;
//! each maps to a distinct user-facing message through `AppError`.

use lopdf::Document;
use smartcv_core::{AppError, ExtractionFailure};
use thiserror::Error;

/// Minimum number of characters (after trimming) for a result to count as
/// readable text.
const MIN_READABLE_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not a valid PDF: {0}")]
    InvalidFormat(String),

    #[error("PDF is password-protected")]
    PasswordProtected,

    #[error("No readable text in document")]
    NoReadableText,

    #[error("Extraction failed: {0}")]
    Unknown(String),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        let kind = match &err {
            ExtractionError::InvalidInput(_) => {
                return AppError::InvalidInput(err.to_string());
            }
            ExtractionError::InvalidFormat(_) => ExtractionFailure::InvalidFormat,
            ExtractionError::PasswordProtected => ExtractionFailure::PasswordProtected,
            ExtractionError::NoReadableText => ExtractionFailure::NoReadableText,
            ExtractionError::Unknown(_) => ExtractionFailure::Unknown,
        };
        AppError::Extraction {
            kind,
            detail: err.to_string(),
        }
    }
}

/// Extracts plain text from uploaded PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, data: &[u8], content_type: &str) -> Result<String, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::InvalidInput("empty upload".to_string()));
        }

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        if !mime.eq_ignore_ascii_case("application/pdf") {
            return Err(ExtractionError::InvalidInput(format!(
                "unsupported content type: {}",
                content_type
            )));
        }

        if !data.starts_with(b"%PDF") {
            return Err(ExtractionError::InvalidFormat(
                "missing %PDF header".to_string(),
            ));
        }

        let doc = Document::load_mem(data)
            .map_err(|e| ExtractionError::InvalidFormat(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(ExtractionError::PasswordProtected);
        }

        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut texts = Vec::with_capacity(page_count);
        let mut failed_pages = 0usize;

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    failed_pages += 1;
                    tracing::warn!(
                        page = page_number,
                        error = %e,
                        "Skipping unreadable PDF page"
                    );
                }
            }
        }

        if page_count > 0 && failed_pages == page_count {
            return Err(ExtractionError::Unknown(format!(
                "all {} pages failed to extract",
                page_count
            )));
        }

        let combined = texts.join("\n\n");
        let trimmed = combined.trim();

        if trimmed.chars().count() < MIN_READABLE_CHARS {
            return Err(ExtractionError::NoReadableText);
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a valid single-page PDF containing the given text.
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extracts_text_from_valid_pdf() {
        let pdf = make_test_pdf("Experienced software developer with Rust skills");
        let text = TextExtractor::new()
            .extract(&pdf, "application/pdf")
            .unwrap();
        assert!(text.contains("software developer"));
    }

    #[test]
    fn test_empty_input_is_invalid_input() {
        let result = TextExtractor::new().extract(&[], "application/pdf");
        assert!(matches!(result, Err(ExtractionError::InvalidInput(_))));
    }

    #[test]
    fn test_wrong_content_type_is_invalid_input() {
        let pdf = make_test_pdf("some text");
        let result = TextExtractor::new().extract(&pdf, "image/png");
        assert!(matches!(result, Err(ExtractionError::InvalidInput(_))));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let pdf = make_test_pdf("Experienced software developer with Rust skills");
        let result = TextExtractor::new().extract(&pdf, "application/pdf; charset=binary");
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_magic_is_invalid_format() {
        let result = TextExtractor::new().extract(b"hello world not a pdf", "application/pdf");
        assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
    }

    #[test]
    fn test_garbage_after_magic_is_invalid_format() {
        let result =
            TextExtractor::new().extract(b"%PDF-1.4 garbage garbage garbage", "application/pdf");
        assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
    }

    #[test]
    fn test_too_little_text_is_no_readable_text() {
        let pdf = make_test_pdf("hi");
        let result = TextExtractor::new().extract(&pdf, "application/pdf");
        assert!(matches!(result, Err(ExtractionError::NoReadableText)));
    }

    #[test]
    fn test_errors_map_to_app_error_extraction() {
        let err: AppError = ExtractionError::NoReadableText.into();
        assert!(matches!(
            err,
            AppError::Extraction {
                kind: ExtractionFailure::NoReadableText,
                ..
            }
        ));

        let err: AppError = ExtractionError::InvalidInput("empty".to_string()).into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
