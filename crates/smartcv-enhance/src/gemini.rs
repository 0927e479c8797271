//! Gemini provider. Sends the original PDF bytes inline (base64) so the
//! model sees the document layout, not just the extracted text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smartcv_core::models::EnhancedCv;
use smartcv_core::EnhancementProvider;
use std::time::Duration;

use crate::{parse, prompt, EnhanceError, EnhanceRequest, Enhancer};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiEnhancer {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiEnhancer {
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

    fn build_request(&self, pdf: &[u8]) -> GenerateContentRequest {
        use base64::Engine;
        let pdf_base64 = base64::engine::general_purpose::STANDARD.encode(pdf);

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt::pdf_prompt(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "application/pdf".to_string(),
                            data: pdf_base64,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_k: 32,
                top_p: 1.0,
                max_output_tokens: 2048,
            },
        }
    }
}

#[async_trait]
impl Enhancer for GeminiEnhancer {
    fn provider(&self) -> EnhancementProvider {
        EnhancementProvider::Gemini
    }

    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhancedCv, EnhanceError> {
        tracing::info!(
            document_id = %request.document_id,
            provider = %self.provider(),
            model = %self.model,
            pdf_size = request.pdf.len(),
            "Enhancing CV"
        );

        let body = self.build_request(&request.pdf);
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        let response = self.http_client.post(&url).json(&body).send().await?;

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

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| EnhanceError::Transport(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(EnhanceError::EmptyResponse)?;

        Ok(parse::parse_response(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_embeds_pdf_base64_and_generation_config() {
        let enhancer =
            GeminiEnhancer::new("key".to_string(), "gemini-1.5-flash".to_string(), 60).unwrap();
        assert_eq!(enhancer.provider(), EnhancementProvider::Gemini);
        let body = enhancer.build_request(b"%PDF-1.4 fake");
        let json = serde_json::to_value(&body).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert!(parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("Only return the JSON object"));
        assert_eq!(
            parts[1]["inline_data"]["mime_type"].as_str().unwrap(),
            "application/pdf"
        );
        {
            use base64::Engine;
            let expected = base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.4 fake");
            assert_eq!(parts[1]["inline_data"]["data"].as_str().unwrap(), expected);
        }

        let config = &json["generationConfig"];
        assert_eq!(config["temperature"].as_f64().unwrap(), 0.3f32 as f64);
        assert_eq!(config["topK"].as_u64().unwrap(), 32);
        assert_eq!(config["maxOutputTokens"].as_u64().unwrap(), 2048);
    }
}
