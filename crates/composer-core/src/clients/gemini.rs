//! Gemini client for email text generation

use crate::clients::ResponseSchema;
use crate::config::GeminiConfig;
use crate::constants::API_KEY_PLACEHOLDER;
use crate::error::{ComposerError, Result};
use crate::workflow::TextGenerator;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

pub struct GeminiClient {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| ComposerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn api_key(&self) -> Result<&str> {
        let key = self.config.api_key.trim();
        if key.is_empty() || key == API_KEY_PLACEHOLDER {
            return Err(ComposerError::Config(
                "Gemini API key is not set. Add it to the config file or set GEMINI_API_KEY.".to_string(),
            ));
        }
        Ok(key)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, schema: Option<&ResponseSchema>) -> Result<String> {
        let api_key = self.api_key()?;
        let url = self.endpoint();
        let request = GenerateContentRequest::new(prompt, schema);

        debug!("Gemini request to {} (structured: {})", url, schema.is_some());

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ComposerError::Upstream(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(ComposerError::Upstream(format!(
                "API call failed with status {}. Please check your API key and try again.",
                status
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ComposerError::Upstream(format!("Failed to parse Gemini response: {}", e)))?;

        envelope.first_text()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, schema: Option<&'a ResponseSchema>) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: schema.map(|response_schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a ResponseSchema,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, which must be non-empty
    fn first_text(self) -> Result<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                error!("Gemini response had no candidate text");
                ComposerError::Upstream("Invalid response from API.".to_string())
            })
    }
}
