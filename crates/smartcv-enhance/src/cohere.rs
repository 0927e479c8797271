//! Cohere provider. Works from the extracted text, embedded in the prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smartcv_core::models::EnhancedCv;
use smartcv_core::EnhancementProvider;
use std::time::Duration;

use crate::{parse, prompt, EnhanceError, EnhanceRequest, Enhancer};

const API_URL: &str = "https://api.cohere.ai/v1/generate";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    text: String,
}

pub struct CohereEnhancer {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl CohereEnhancer {
    pub fn new(api_key: String, model: String, timeout_secs: u64) -> Result<Self, EnhanceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EnhanceError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }

    fn build_request(&self, cv_text: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt::text_prompt(cv_text),
            max_tokens: 2000,
            temperature: 0.3,
        }
    }
}

#[async_trait]
impl Enhancer for CohereEnhancer {
    fn provider(&self) -> EnhancementProvider {
        EnhancementProvider::Cohere
    }

    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhancedCv, EnhanceError> {
        tracing::info!(
            document_id = %request.document_id,
            provider = %self.provider(),
            model = %self.model,
            text_len = request.cv_text.len(),
            "Enhancing CV"
        );

        let body = self.build_request(&request.cv_text);

        let response = self
            .http_client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EnhanceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EnhanceError::Transport(e.to_string()))?;

        let text = parsed
            .generations
            .into_iter()
            .next()
            .map(|g| g.text)
            .filter(|t| !t.is_empty())
            .ok_or(EnhanceError::EmptyResponse)?;

        Ok(parse::parse_response(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_embeds_cv_text_and_parameters() {
        let enhancer = CohereEnhancer::new("key".to_string(), "command".to_string(), 60).unwrap();
        assert_eq!(enhancer.provider(), EnhancementProvider::Cohere);
        let body = enhancer.build_request("JANE DOE\nEngineer");
        assert_eq!(body.model, "command");
        assert_eq!(body.max_tokens, 2000);
        assert!(body.prompt.contains("JANE DOE"));
        assert!(body.prompt.contains("Original CV text:"));
    }
}
