use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Remote model configuration.
///
/// Provider specific keys (`base_url`, `api_key`, ...) are kept in `settings`
/// and decoded by the provider itself.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelConfig {
    pub name: String,
    #[serde(alias = "type")]
    pub provider: ModelProvider,
    #[serde(default, flatten)]
    pub settings: HashMap<String, serde_yaml::Value>,
}

impl ModelConfig {
    /// Reads a single provider setting, returning `None` when absent or of the wrong type.
    pub fn get_setting<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.settings
            .get(key)
            .and_then(|v| serde_yaml::from_value(v.clone()).ok())
    }
}

/// Supported gateway integrations (serialized as lowercase strings).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Openai,
    Test,
}

impl From<ModelProvider> for String {
    fn from(val: ModelProvider) -> Self {
        val.as_str().into()
    }
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match &self {
            ModelProvider::Openai => "openai",
            ModelProvider::Test => "test",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_type_alias_and_settings() {
        let yaml = r#"
name: meta-llama/Llama-3.3-70B-Instruct-Turbo
type: openai
base_url: https://api.together.xyz/v1
request_timeout_secs: 30
"#;
        let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider, ModelProvider::Openai);
        assert_eq!(
            config.get_setting::<String>("base_url").as_deref(),
            Some("https://api.together.xyz/v1")
        );
        assert_eq!(config.get_setting::<u64>("request_timeout_secs"), Some(30));
        assert_eq!(config.get_setting::<String>("missing"), None);
    }

    #[test]
    fn test_provider_as_str() {
        assert_eq!(ModelProvider::Openai.as_str(), "openai");
        let s: String = ModelProvider::Test.into();
        assert_eq!(s, "test");
    }
}
