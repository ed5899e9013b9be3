use super::openai_types::{ChatCompletionRequest, ChatCompletionResponse, ErrorResponse};
use crate::completion::{CompletionGateway, CompletionRequest, GatewayError};
use crate::config::{ConfigError, resolve_secret};
use crate::model::ModelConfig;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OpenAISettings {
    base_url: String,
    api_key: String,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

/// Gateway for any OpenAI compatible `/chat/completions` endpoint.
pub struct OpenAIGateway {
    config: ModelConfig,
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAIGateway {
    pub fn new(model_config: ModelConfig) -> Result<Self, ConfigError> {
        let settings: OpenAISettings =
            serde_yaml::from_value(serde_yaml::to_value(&model_config.settings)?)?;

        // `env:NAME` keys are looked up at construction so a missing key fails at startup
        let api_key = resolve_secret(&settings.api_key)?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Config(format!("Failed to create HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/chat/completions",
            settings.base_url.trim_end_matches('/')
        );

        Ok(Self {
            config: model_config,
            client,
            endpoint,
            api_key,
        })
    }
}

/// Pull a readable message out of an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl CompletionGateway for OpenAIGateway {
    #[instrument(skip_all, fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest::from(request);
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let latency_ms = start_time.elapsed().as_millis();

        if !status.is_success() {
            let message = api_error_message(&text);
            warn!(status = status.as_u16(), %message, "Completion request failed");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage {
            debug!(
                provider = self.config.provider.as_str(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                latency_ms,
                "Completion received"
            );
        }

        // Only the first choice is used
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyResponse)?;
        debug!(finish_reason = ?choice.finish_reason);

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(GatewayError::EmptyResponse),
        }
    }
}
