use crate::error::GeminiError;
use crate::types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client. `api_key: None` falls back to the `GEMINI_API_KEY`
    /// then `GOOGLE_API_KEY` environment variables.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .map_err(|_| GeminiError::MissingApiKey)?,
        };
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// One synchronous prompt/response round trip; returns the text of the
    /// first candidate.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.4),
                max_output_tokens: Some(2048),
            }),
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "generateContent request");
        let response = self
            .http
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return match response.json::<ApiErrorBody>().await {
                Ok(body) => Err(GeminiError::Api {
                    code: body.error.code,
                    status: body.error.status,
                    message: body.error.message,
                }),
                Err(_) => Err(GeminiError::Api {
                    code: i32::from(status.as_u16()),
                    status: status.to_string(),
                    message: "unrecognized error body".to_string(),
                }),
            };
        }

        let body: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &body.usage_metadata {
            tracing::debug!(
                prompt_tokens = ?usage.prompt_token_count,
                total_tokens = ?usage.total_token_count,
                "generateContent usage"
            );
        }
        body.text().ok_or(GeminiError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
