use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored CV document. `file_name` is the sanitized, timestamped name
/// used in the storage key; `original_filename` is what the user uploaded.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub original_filename: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub backed_up_to_s3: bool,
    pub s3_key: Option<String>,
    pub analysis_json: Option<serde_json::Value>,
}

impl Document {
    /// Key of the stored bytes in the primary backend.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.user_id, self.file_name)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub backed_up_to_s3: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_json: Option<serde_json::Value>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            file_name: doc.original_filename,
            file_url: doc.file_url,
            file_type: doc.file_type,
            uploaded_at: doc.uploaded_at,
            backed_up_to_s3: doc.backed_up_to_s3,
            s3_key: doc.s3_key,
            analysis_json: doc.analysis_json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document() -> Document {
        Document {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            file_name: "1700000000000-resume.pdf".to_string(),
            original_filename: "Resume.PDF".to_string(),
            file_url: "http://localhost:4000/files/user/1700000000000-resume.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            uploaded_at: Utc::now(),
            backed_up_to_s3: false,
            s3_key: None,
            analysis_json: None,
        }
    }

    #[test]
    fn test_storage_key_is_user_scoped() {
        let doc = test_document();
        assert_eq!(
            doc.storage_key(),
            format!("{}/1700000000000-resume.pdf", doc.user_id)
        );
    }

    #[test]
    fn test_response_uses_original_filename() {
        let doc = test_document();
        let id = doc.id;
        let response = DocumentResponse::from(doc);
        assert_eq!(response.id, id);
        assert_eq!(response.file_name, "Resume.PDF");
        assert!(!response.backed_up_to_s3);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let doc = test_document();
        let json = serde_json::to_value(DocumentResponse::from(doc)).unwrap();
        assert!(json.get("fileName").is_some());
        assert!(json.get("backedUpToS3").is_some());
        assert!(json.get("s3_key").is_none());
    }
}
