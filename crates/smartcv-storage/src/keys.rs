//! Shared key generation for storage backends.
//!
//! Primary key format: `{user_id}/{file_name}`. Backup key format:
//! `backups/{document_id}/{file_name}`.

use uuid::Uuid;

/// Generate the primary storage key for a user's document.
pub fn document_key(user_id: Uuid, file_name: &str) -> String {
    format!("{}/{}", user_id, file_name)
}

/// Generate the backup destination key for a document.
///
/// Only the final path segment of the primary key is kept, so re-running a
/// backup for the same document always targets the same key.
pub fn backup_key(document_id: Uuid, primary_key: &str) -> String {
    let file_name = primary_key.rsplit('/').next().unwrap_or(primary_key);
    format!("backups/{}/{}", document_id, file_name)
}
