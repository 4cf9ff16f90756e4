use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::insight::{parse_insights, Insight};
use crate::models::snapshot::AdviceSnapshot;
use super::prompt::build_prompt;
use super::traits::AdviceProvider;

const PROVIDER: &str = "Gemini";

/// Google Gemini (Generative Language API) advice provider.
///
/// - **Endpoint**: `POST {base_url}/models/{model}:generateContent`
/// - **Requires**: API key, sent in the `x-goog-api-key` header
/// - **Output**: constrained to a JSON array of insights via `responseSchema`
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body: the prompt plus a schema pinning the reply shape.
    pub fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "type": { "type": "STRING", "enum": ["alert", "advice", "investment"] },
                            "title": { "type": "STRING" },
                            "content": { "type": "STRING" },
                            "severity": { "type": "STRING", "enum": ["low", "medium", "high"] }
                        },
                        "required": ["type", "title", "content", "severity"]
                    }
                }
            }
        })
    }
}

// ── Gemini API response types ───────────────────────────────────────

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Concatenated text of the first candidate; empty if the model said nothing.
fn response_text(resp: GenerateContentResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default()
}

/// Parse a raw `generateContent` reply body into insights.
pub fn parse_generate_content(body: &str) -> Result<Vec<Insight>, CoreError> {
    let resp: GenerateContentResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse response: {e}"),
    })?;
    parse_insights(&response_text(resp))
}

#[async_trait]
impl AdviceProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_insights(&self, snapshot: &AdviceSnapshot) -> Result<Vec<Insight>, CoreError> {
        let prompt = build_prompt(snapshot)?;
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending advice request");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&prompt))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        parse_generate_content(&body)
    }
}
