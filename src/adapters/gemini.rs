//! Generative-text client for the Gemini REST API.

use crate::adapters::api_error_message;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{BootError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";
const SERVICE: &str = "Gemini";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Builds the client with the key installed as a default header. Fails if
    /// the key is blank or cannot be sent as a header value.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(BootError::client_init("API key is empty"));
        }

        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| BootError::client_init("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(BootError::client_init)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(model = %model, prompt_len = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(self.api_url(model, "generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BootError::service(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BootError::service(
                SERVICE,
                format!("{} returned {}: {}", model, status, api_error_message(&body)),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BootError::service(SERVICE, format!("failed to parse response: {}", e)))?;

        parsed.text().ok_or_else(|| {
            let reason = parsed
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .or_else(|| parsed.candidates.first().and_then(|c| c.finish_reason.clone()))
                .unwrap_or_else(|| "no candidates".to_string());
            BootError::service(SERVICE, format!("{} returned no text ({})", model, reason))
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_rejects_blank_or_malformed_key() {
        let err = GeminiClient::new("  ", "https://example.com").unwrap_err();
        assert!(matches!(err, BootError::ClientInitError { .. }));

        let err = GeminiClient::new("abc\ndef", "https://example.com").unwrap_err();
        assert!(matches!(err, BootError::ClientInitError { .. }));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let parsed: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "there"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello there"));
    }

    #[tokio::test]
    async fn test_generate_sends_key_and_prompt() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-1.5-flash:generateContent")
                .header("x-goog-api-key", "test-key")
                .json_body(serde_json::json!({
                    "contents": [{"role": "user", "parts": [{"text": "ping"}]}]
                }));
            then.status(200).json_body(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "pong"}]}, "finishReason": "STOP"}]
            }));
        });

        let client = GeminiClient::new("test-key", &server.base_url()).unwrap();
        let text = client.generate("gemini-1.5-flash", "ping").await.unwrap();

        mock.assert();
        assert_eq!(text, "pong");
    }

    #[tokio::test]
    async fn test_generate_maps_http_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/models/gemini-1.5-flash:generateContent");
            then.status(404).json_body(serde_json::json!({
                "error": {"code": 404, "message": "model not found", "status": "NOT_FOUND"}
            }));
        });

        let client = GeminiClient::new("test-key", &server.base_url()).unwrap();
        let err = client.generate("gemini-1.5-flash", "ping").await.unwrap_err();

        assert!(matches!(err, BootError::ServiceCallError { .. }));
        assert!(err.to_string().contains("model not found"));
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/models/gemini-1.5-flash:generateContent");
            then.status(200).json_body(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            }));
        });

        let client = GeminiClient::new("test-key", &server.base_url()).unwrap();
        let err = client.generate("gemini-1.5-flash", "ping").await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
