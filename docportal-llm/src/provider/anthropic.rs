//! Anthropic Claude provider implementation

use super::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Anthropic Claude provider
#[derive(Debug)]
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let model = request.model.as_deref().unwrap_or(self.default_model());

        // The messages API takes the system prompt as a top-level field
        let (system, messages): (Option<String>, Vec<AnthropicMessage>) = {
            let mut sys = None;
            let mut msgs = Vec::new();
            for msg in request.messages {
                if msg.role == Role::System {
                    sys = Some(msg.content);
                } else {
                    msgs.push(AnthropicMessage {
                        role: match msg.role {
                            Role::Assistant => "assistant",
                            _ => "user",
                        },
                        content: msg.content,
                    });
                }
            }
            (sys, msgs)
        };

        let api_request = AnthropicRequest {
            model: model.to_string(),
            messages,
            system,
            max_tokens: request.max_tokens.unwrap_or(4096),
            temperature: request.temperature,
        };

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(ProviderError::AuthenticationFailed)?;

        let response = self
            .client
            .post(format!("{}/messages", self.config.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();

            if status == 429 {
                return Err(ProviderError::RateLimited { retry_after: None });
            } else if status == 401 {
                return Err(ProviderError::AuthenticationFailed);
            }

            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let mut content = String::new();
        for block in &api_response.content {
            if let ContentBlock::Text { text } = block {
                content.push_str(text);
            }
        }
        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let usage = Usage {
            prompt_tokens: api_response.usage.input_tokens,
            completion_tokens: api_response.usage.output_tokens,
            total_tokens: api_response.usage.input_tokens + api_response.usage.output_tokens,
        };

        Ok(CompletionResponse {
            model: api_response.model,
            content,
            usage,
        })
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

#[derive(Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: usize,
    #[serde(default)]
    output_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_lifted_to_top_level() {
        let api_request = AnthropicRequest {
            model: "claude-sonnet-4-20250514".into(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: "compare".into(),
            }],
            system: Some("You are a document analyst".into()),
            max_tokens: 4096,
            temperature: Some(0.0),
        };

        let json = serde_json::to_value(&api_request).unwrap();
        assert_eq!(json["system"], "You are a document analyst");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_text_blocks() {
        let raw = r#"{
            "model": "claude-sonnet-4-20250514",
            "content": [{"type": "text", "text": "[{\"page\": \"1\", \"changes\": \"none\"}]"}],
            "usage": {"input_tokens": 50, "output_tokens": 20}
        }"#;

        let parsed: AnthropicResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content.len(), 1);
        assert_eq!(parsed.usage.input_tokens, 50);
    }
}
