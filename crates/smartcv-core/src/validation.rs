//! File name validation and sanitization for uploads.

/// Sanitize a user-supplied file name for use in a storage key.
///
/// Lowercases the name, replaces anything outside `[a-z0-9.-]` with `_`,
/// collapses runs of `_`, and trims `_` from both ends. An empty result
/// becomes `file`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '-' {
            out.push(ch);
            last_was_underscore = false;
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the unique stored name: the upload timestamp in milliseconds
/// prefixed to the sanitized original name.
pub fn unique_filename(original: &str, timestamp_millis: i64) -> String {
    format!("{}-{}", timestamp_millis, sanitize_filename(original))
}
