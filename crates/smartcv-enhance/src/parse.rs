//! Tolerant parsing of provider responses.
//!
//! Providers are asked for bare JSON but routinely wrap it in prose or
//! code fences. We locate the first balanced `{...}` span and parse that;
//! if nothing parses, the raw text is preserved in a fixed fallback record
//! so the caller always gets a usable payload.

use smartcv_core::models::{EnhancedCv, PersonalInfo};

const FALLBACK_NAME: &str = "Enhanced CV";
const FALLBACK_SUMMARY: &str = "This CV has been enhanced with AI improvements";
const FALLBACK_IMPROVEMENTS: [&str; 3] = [
    "Content enhancement",
    "Professional formatting",
    "ATS optimization",
];

/// Locate the first balanced top-level `{...}` span in free text.
///
/// Braces inside JSON strings are ignored, including escaped quotes.
/// Returns `None` when no opening brace exists or the span never closes.
pub fn find_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// The fixed record used when a provider response cannot be parsed.
pub fn fallback_record(raw: &str) -> EnhancedCv {
    EnhancedCv {
        personal_info: PersonalInfo {
            name: Some(FALLBACK_NAME.to_string()),
            summary: Some(FALLBACK_SUMMARY.to_string()),
            ..Default::default()
        },
        improvements: FALLBACK_IMPROVEMENTS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        raw_content: Some(raw.to_string()),
        ..Default::default()
    }
}

/// Parse a provider response into an `EnhancedCv`. Never fails: an
/// unparseable response becomes the fallback record carrying the raw text.
pub fn parse_response(raw: &str) -> EnhancedCv {
    if let Some(span) = find_json_span(raw) {
        match serde_json::from_str::<EnhancedCv>(span) {
            Ok(cv) => return cv,
            Err(e) => {
                tracing::warn!(error = %e, "Provider response JSON did not match the CV schema");
            }
        }
    } else {
        tracing::warn!("No JSON object found in provider response");
    }

    fallback_record(raw)
}
