use crate::analysis::AnalysisRequest;
use crate::config::AppConfig;
use crate::error::{AppError, ServiceError};
use crate::inference::InferenceBackend;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

// Request/response envelopes for the generateContent REST endpoint.

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// One hosted Gemini model reachable over the generateContent REST API.
/// The primary and fallback backends are two instances of this type sharing
/// one HTTP client.
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(config: &AppConfig, model: &str, client: reqwest::Client) -> Result<Self, AppError> {
        log::debug!(
            "Creating Gemini client for model {} at {}",
            model,
            config.api_base_url
        );
        let base = Url::parse(&config.api_base_url)?;
        let endpoint = base.join(&format!("v1beta/models/{}:generateContent", model))?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl InferenceBackend for GeminiBackend {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &AnalysisRequest) -> Result<String, ServiceError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: &request.instruction,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &request.payload.mime_type,
                            data: STANDARD.encode(&request.payload.bytes),
                        },
                    },
                ],
            }],
            generation_config: WireGenerationConfig {
                temperature: request.generation.temperature,
                max_output_tokens: request.generation.max_output_tokens,
            },
        };

        log::trace!(
            "POST {} ({} byte image as {})",
            self.endpoint,
            request.payload.bytes.len(),
            request.payload.mime_type
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = message.chars().take(512).collect::<String>();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;

        let candidate = envelope
            .candidates
            .into_iter()
            .next()
            .ok_or(ServiceError::EmptyResponse)?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse);
        }

        Ok(text)
    }
}
