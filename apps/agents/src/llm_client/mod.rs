/// LLM Client — the single point of entry for all text-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Agents receive an `Arc<dyn TextCompletion>` and go through it.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all completion calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Missing API credentials")]
    MissingCredentials,

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Generation parameters forwarded to the completion API.
/// Agents derive these from their merged `AgentConfig` per call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 4096,
        }
    }
}

/// What a completion call yields after fence stripping.
///
/// The client attempts a JSON parse of the stripped text; on parse failure it
/// falls back to the raw string rather than erroring. Callers must tolerate
/// either shape — agents convert `Text` into a validation failure.
#[derive(Debug, Clone)]
pub enum CompletionPayload {
    Json(Value),
    Text(String),
}

impl CompletionPayload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            CompletionPayload::Json(v) => Some(v),
            CompletionPayload::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            CompletionPayload::Json(v) => Some(v),
            CompletionPayload::Text(_) => None,
        }
    }
}

/// The text-completion seam. Agents depend on this trait, never on the
/// concrete client, so orchestrator and workflow tests can inject stubs.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        params: &GenerationParams,
    ) -> Result<CompletionPayload, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The production completion client. Wraps the Anthropic Messages API with
/// retry logic and the JSON-or-string payload contract.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredentials);
        }
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        params: &GenerationParams,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextCompletion for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        params: &GenerationParams,
    ) -> Result<CompletionPayload, LlmError> {
        let response = self.call(prompt, system, params).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        match serde_json::from_str::<Value>(text) {
            Ok(value) => Ok(CompletionPayload::Json(value)),
            Err(e) => {
                warn!("Completion was not valid JSON ({e}); falling back to raw text");
                Ok(CompletionPayload::Text(text.to_string()))
            }
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_client_rejects_empty_api_key() {
        let result = LlmClient::new("  ".to_string());
        assert!(matches!(result, Err(LlmError::MissingCredentials)));
    }

    #[test]
    fn test_payload_json_accessors() {
        let payload = CompletionPayload::Json(serde_json::json!({"ok": true}));
        assert!(payload.as_json().is_some());
        assert!(payload.into_json().is_some());

        let payload = CompletionPayload::Text("not json".to_string());
        assert!(payload.as_json().is_none());
        assert!(payload.into_json().is_none());
    }

    #[test]
    fn test_generation_params_defaults() {
        let params = GenerationParams::default();
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(params.max_output_tokens, 4096);
    }
}
