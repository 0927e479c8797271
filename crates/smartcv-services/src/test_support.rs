//! In-memory fakes shared by the pipeline and backup tests.

use async_trait::async_trait;
use chrono::Utc;
use smartcv_core::models::{Document, EnhancedCv, PersonalInfo};
use smartcv_core::{AppError, EnhancementProvider, StorageBackend};
use smartcv_db::{DocumentRecords, NewDocument};
use smartcv_enhance::{parse, EnhanceError, EnhanceRequest, Enhancer};
use smartcv_storage::{Storage, StorageError, StorageResult};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Document store backed by a `Vec` behind a mutex.
pub struct InMemoryRecords {
    rows: Mutex<Vec<Document>>,
    fail_mark_backed_up: Mutex<bool>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_mark_backed_up: Mutex::new(false),
        }
    }

    /// Insert a row directly, bypassing the pipeline.
    pub async fn seed(&self, user_id: Uuid, file_name: &str, file_type: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().await.push(Document {
            id,
            user_id,
            file_name: file_name.to_string(),
            original_filename: file_name.to_string(),
            file_url: format!("http://localhost:8080/files/{}/{}", user_id, file_name),
            file_type: file_type.to_string(),
            uploaded_at: Utc::now(),
            backed_up_to_s3: false,
            s3_key: None,
            analysis_json: None,
        });
        id
    }

    /// Make every subsequent `mark_backed_up` call fail.
    pub async fn fail_mark_backed_up(&self) {
        *self.fail_mark_backed_up.lock().await = true;
    }

    pub async fn all(&self) -> Vec<Document> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl DocumentRecords for InMemoryRecords {
    async fn insert(&self, new: NewDocument) -> Result<Document, AppError> {
        let document = Document {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            file_name: new.file_name,
            original_filename: new.original_filename,
            file_url: new.file_url,
            file_type: new.file_type,
            uploaded_at: new.uploaded_at,
            backed_up_to_s3: false,
            s3_key: None,
            analysis_json: None,
        };
        self.rows.lock().await.push(document.clone());
        Ok(document)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self.rows.lock().await.iter().find(|d| d.id == id).cloned())
    }

    async fn get_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|d| d.id == id && d.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let mut documents: Vec<Document> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(documents)
    }

    async fn update_analysis(
        &self,
        id: Uuid,
        analysis: serde_json::Value,
    ) -> Result<(), AppError> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;
        row.analysis_json = Some(analysis);
        Ok(())
    }

    async fn mark_backed_up(&self, id: Uuid, s3_key: &str) -> Result<(), AppError> {
        if *self.fail_mark_backed_up.lock().await {
            return Err(AppError::Internal("simulated flag update failure".to_string()));
        }
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;
        row.backed_up_to_s3 = true;
        row.s3_key = Some(s3_key.to_string());
        Ok(())
    }

    async fn list_pending_backup(&self) -> Result<Vec<Document>, AppError> {
        let mut documents: Vec<Document> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|d| !d.backed_up_to_s3)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
        Ok(documents)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.lock().await.retain(|d| d.id != id);
        Ok(())
    }
}

/// Storage whose writes always fail.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload(
        &self,
        _user_id: Uuid,
        _file_name: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        Err(StorageError::UploadFailed(
            "simulated upload failure".to_string(),
        ))
    }

    async fn upload_with_key(
        &self,
        _storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed(
            "simulated upload failure".to_string(),
        ))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

enum StubResponse {
    Parsed,
    Fallback,
    Fail,
}

/// Enhancer stub with a fixed result.
pub struct StubEnhancer {
    response: StubResponse,
}

impl StubEnhancer {
    pub fn succeeding() -> Self {
        Self {
            response: StubResponse::Parsed,
        }
    }

    /// Behaves like a provider whose reply contains no usable JSON.
    pub fn unparseable() -> Self {
        Self {
            response: StubResponse::Fallback,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: StubResponse::Fail,
        }
    }
}

#[async_trait]
impl Enhancer for StubEnhancer {
    fn provider(&self) -> EnhancementProvider {
        EnhancementProvider::Gemini
    }

    async fn enhance(&self, _request: &EnhanceRequest) -> Result<EnhancedCv, EnhanceError> {
        match self.response {
            StubResponse::Fail => Err(EnhanceError::Transport("connection refused".to_string())),
            StubResponse::Fallback => Ok(parse::fallback_record(
                "I can only describe this CV in prose, sorry.",
            )),
            StubResponse::Parsed => Ok(EnhancedCv {
                personal_info: PersonalInfo {
                    name: Some("Jane".to_string()),
                    summary: Some("Seasoned engineer".to_string()),
                    ..Default::default()
                },
                skills: vec!["Rust".to_string()],
                ..Default::default()
            }),
        }
    }
}

/// Generate a valid single-page PDF containing the given text.
pub fn make_test_pdf(text: &str) -> Vec<u8> {
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

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

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
