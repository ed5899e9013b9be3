//! A scripted gateway for tests and offline runs.
use crate::completion::{CompletionGateway, CompletionRequest, GatewayError};
use crate::model::ModelConfig;
use async_trait::async_trait;

/// A `CompletionGateway` that never touches the network.
///
/// Behavior is configured via settings in the `ModelConfig`:
/// - `response_mode: error` fails every call with an API error.
/// - `response_mode: echo` replies with the last user message.
/// - otherwise replies with the `response` setting, or "Hello world".
#[derive(Debug)]
pub struct TestGateway {
    config: ModelConfig,
}

impl TestGateway {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CompletionGateway for TestGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let response_mode: String = self.config.get_setting("response_mode").unwrap_or_default();

        match response_mode.as_str() {
            "error" => Err(GatewayError::Api {
                status: 503,
                message: "TestGateway error".to_string(),
            }),
            "echo" => request
                .user_message()
                .map(str::to_string)
                .ok_or(GatewayError::EmptyResponse),
            _ => Ok(self
                .config
                .get_setting("response")
                .unwrap_or_else(|| "Hello world".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelProvider;
    use std::collections::HashMap;

    fn gateway(settings: &[(&str, &str)]) -> TestGateway {
        TestGateway::new(ModelConfig {
            name: "test".to_string(),
            provider: ModelProvider::Test,
            settings: settings
                .iter()
                .map(|(k, v)| (k.to_string(), (*v).into()))
                .collect::<HashMap<_, _>>(),
        })
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("test", "sys", &[], "ping", 0.5, 16)
    }

    #[tokio::test]
    async fn test_default_response() {
        assert_eq!(gateway(&[]).complete(&request()).await.unwrap(), "Hello world");
        assert_eq!(
            gateway(&[("response", "Hi there")])
                .complete(&request())
                .await
                .unwrap(),
            "Hi there"
        );
    }

    #[tokio::test]
    async fn test_echo_and_error_modes() {
        assert_eq!(
            gateway(&[("response_mode", "echo")])
                .complete(&request())
                .await
                .unwrap(),
            "ping"
        );
        let err = gateway(&[("response_mode", "error")])
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 503, .. }));
    }
}
