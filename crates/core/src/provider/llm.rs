use crate::completion::CompletionGateway;
use crate::config::ConfigError;
use crate::model::{ModelConfig, ModelProvider};
use crate::provider::{openai, test_provider};
use tracing::instrument;

#[instrument(skip(model_config), fields(model = %model_config.name))]
pub fn get_completion_gateway(
    model_config: ModelConfig,
) -> Result<Box<dyn CompletionGateway>, ConfigError> {
    match model_config.provider {
        ModelProvider::Openai => {
            let gateway = openai::OpenAIGateway::new(model_config)?;
            Ok(Box::new(gateway))
        }
        ModelProvider::Test => Ok(Box::new(test_provider::TestGateway::new(model_config))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_get_completion_gateway_openai_provider() {
        let mut settings = HashMap::new();
        settings.insert("base_url".to_string(), "http://localhost:1234".into());
        settings.insert("api_key".to_string(), "sk-dummy".into());
        let model_config = ModelConfig {
            name: "test-openai".to_string(),
            provider: ModelProvider::Openai,
            settings,
        };
        assert!(get_completion_gateway(model_config).is_ok());
    }

    #[test]
    fn test_get_completion_gateway_openai_missing_settings() {
        let model_config = ModelConfig {
            name: "test-openai".to_string(),
            provider: ModelProvider::Openai,
            settings: HashMap::new(),
        };
        assert!(get_completion_gateway(model_config).is_err());
    }

    #[test]
    fn test_get_completion_gateway_unset_env_key_is_config_error() {
        let model_config = ModelConfig {
            name: "test-openai".to_string(),
            provider: ModelProvider::Openai,
            settings: HashMap::from([
                ("base_url".to_string(), "http://localhost:1234".into()),
                ("api_key".to_string(), "env:CONFAB_LLM_TEST_UNSET_KEY".into()),
            ]),
        };
        match get_completion_gateway(model_config) {
            Err(ConfigError::MissingCredential(name)) => {
                assert_eq!(name, "CONFAB_LLM_TEST_UNSET_KEY")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("gateway built without a credential"),
        }
    }

    #[tokio::test]
    async fn test_get_completion_gateway_test_provider() {
        let model_config = ModelConfig {
            name: "test".to_string(),
            provider: ModelProvider::Test,
            settings: HashMap::from([("response".to_string(), "scripted".into())]),
        };
        let gateway = get_completion_gateway(model_config).unwrap();
        let request = crate::completion::CompletionRequest::new("test", "", &[], "hi", 0.7, 8);
        assert_eq!(gateway.complete(&request).await.unwrap(), "scripted");
    }
}
