//! CV enhancement via generative-text providers.
//!
//! The `Enhancer` trait hides the provider: Gemini receives the PDF bytes
//! inline, Cohere receives the extracted text. Both hand their free-text
//! response to the tolerant parser in `parse`, which never fails; a
//! response that cannot be parsed becomes the fixed fallback record.
//! Transport and API failures are the only error path.

pub mod cohere;
pub mod gemini;
pub mod parse;
pub mod prompt;

use async_trait::async_trait;
use smartcv_core::models::EnhancedCv;
use smartcv_core::{Config, EnhancementProvider};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub use cohere::CohereEnhancer;
pub use gemini::GeminiEnhancer;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("Request to enhancement provider failed: {0}")]
    Transport(String),

    #[error("Enhancement provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Enhancement provider returned an empty response")]
    EmptyResponse,

    #[error("Enhancer misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for EnhanceError {
    fn from(err: reqwest::Error) -> Self {
        EnhanceError::Transport(err.to_string())
    }
}

impl From<EnhanceError> for smartcv_core::AppError {
    fn from(err: EnhanceError) -> Self {
        smartcv_core::AppError::Enhancement(err.to_string())
    }
}

/// One enhancement request. Providers pick the field they need.
#[derive(Debug, Clone)]
pub struct EnhanceRequest {
    pub document_id: Uuid,
    pub cv_text: String,
    pub pdf: Vec<u8>,
}

#[async_trait]
pub trait Enhancer: Send + Sync {
    fn provider(&self) -> EnhancementProvider;

    /// Produce the structured CV. Only transport/API failures return `Err`;
    /// an unparseable provider response resolves to the fallback record.
    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhancedCv, EnhanceError>;
}

/// Build the configured enhancer.
pub fn create_enhancer(config: &Config) -> Result<Arc<dyn Enhancer>, EnhanceError> {
    match config.enhancement_provider {
        EnhancementProvider::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or_else(|| EnhanceError::Config("GEMINI_API_KEY not set".to_string()))?;
            let enhancer = GeminiEnhancer::new(
                api_key,
                config.gemini_model.clone(),
                config.enhancement_timeout_secs,
            )?;
            Ok(Arc::new(enhancer))
        }
        EnhancementProvider::Cohere => {
            let api_key = config
                .cohere_api_key
                .clone()
                .ok_or_else(|| EnhanceError::Config("COHERE_API_KEY not set".to_string()))?;
            let enhancer = CohereEnhancer::new(
                api_key,
                config.cohere_model.clone(),
                config.enhancement_timeout_secs,
            )?;
            Ok(Arc::new(enhancer))
        }
    }
}
