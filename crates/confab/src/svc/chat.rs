use anyhow::Result;
use confab_core::completion::{CompletionGateway, GatewayError};
use confab_core::config::Config;
use confab_core::export::{ExportError, save_conversation};
use confab_core::get_completion_gateway;
use confab_core::session::{Session, SessionConfig};
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// Chat conversation between human and AI model
pub struct Chat {
    session: Session,
    gateway: Box<dyn CompletionGateway>,
    export_dir: PathBuf,
}

impl Chat {
    /// Create a chat from configuration. Fails when the gateway cannot be
    /// built, e.g. the API key is missing.
    pub fn new(config: &Config) -> Result<Self> {
        let gateway = get_completion_gateway(config.model.clone())?;
        Ok(Self::with_gateway(
            config.session_config(),
            gateway,
            config.export_dir(),
        ))
    }

    pub fn with_gateway(
        session_config: SessionConfig,
        gateway: Box<dyn CompletionGateway>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            session: Session::new(session_config),
            gateway,
            export_dir,
        }
    }

    /// Send a user message and wait for the reply.
    ///
    /// History is only updated when the model answers with non-empty text.
    #[instrument(skip_all, fields(history = self.session.len()))]
    pub async fn send(&mut self, text: &str) -> Result<String, GatewayError> {
        let request = self.session.build_request(text);
        let reply = self.gateway.complete(&request).await.inspect_err(|e| {
            warn!(error = %e, "Completion failed");
        })?;

        self.session
            .append_turn(text, &reply)
            .map_err(|_| GatewayError::EmptyResponse)?;
        debug!(history = self.session.len(), "Turn completed");
        Ok(reply)
    }

    /// Export the full history into the configured directory.
    pub fn save(&self) -> Result<PathBuf, ExportError> {
        save_conversation(self.session.history(), &self.export_dir)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::chat::test_utils::{RecordingGateway, create_test_chat};
    use confab_core::completion::Message;
    use confab_core::config::ConfigError;
    use confab_core::model::{ModelConfig, ModelProvider};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_send_appends_turn() {
        let (mut chat, _requests) = create_test_chat(RecordingGateway::replying("Hi there"));

        let reply = chat.send("Hello").await.unwrap();

        assert_eq!(reply, "Hi there");
        assert_eq!(
            chat.session().history(),
            &[Message::user("Hello"), Message::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn test_send_failure_keeps_history() {
        let gateway = RecordingGateway::replying("ok").then_fail();
        let (mut chat, requests) = create_test_chat(gateway);

        chat.send("first").await.unwrap();
        assert!(chat.send("second").await.is_err());

        assert_eq!(chat.session().len(), 2);
        // The failed call was still attempted exactly once.
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_send_history_grows_by_two_per_success() {
        let (mut chat, _requests) = create_test_chat(RecordingGateway::replying("reply"));
        for turn in 1..=4 {
            chat.send(&format!("message {turn}")).await.unwrap();
            assert_eq!(chat.session().len(), 2 * turn);
        }
    }

    #[tokio::test]
    async fn test_send_empty_reply_is_failure() {
        let (mut chat, _requests) = create_test_chat(RecordingGateway::replying("   "));
        let err = chat.send("Hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyResponse));
        assert!(chat.session().is_empty());
    }

    #[tokio::test]
    async fn test_send_request_carries_window() {
        let (mut chat, requests) = create_test_chat(RecordingGateway::replying("r"));
        for i in 0..4 {
            chat.send(&format!("m{i}")).await.unwrap();
        }

        let requests = requests.lock().unwrap();
        let last = requests.last().unwrap();
        // system + five history messages + new user message
        assert_eq!(last.messages.len(), 7);
        assert_eq!(last.messages[1], Message::assistant("r"));
        assert_eq!(last.user_message(), Some("m3"));
    }

    #[tokio::test]
    async fn test_save_writes_export() {
        let (mut chat, _requests) = create_test_chat(RecordingGateway::replying("Hi there"));
        chat.send("Hello").await.unwrap();

        let path = chat.save().unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("conversation_"));
        assert!(file_name.ends_with(".json"));

        let saved: Vec<Message> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(saved, chat.session().history());
    }

    #[test]
    fn test_new_from_config_with_test_provider() {
        let config = Config {
            model: ModelConfig {
                name: "test-model".to_string(),
                provider: ModelProvider::Test,
                settings: HashMap::new(),
            },
            chat: Default::default(),
            export_dir: ".".to_string(),
        };
        let chat = Chat::new(&config).unwrap();
        assert_eq!(chat.session().model(), "test-model");
        assert_eq!(chat.session().temperature(), 0.7);
    }

    #[test]
    fn test_new_fails_on_unset_api_key() {
        let config = Config {
            model: ModelConfig {
                name: "test-model".to_string(),
                provider: ModelProvider::Openai,
                settings: HashMap::from([
                    ("base_url".to_string(), "http://localhost:1234/v1".into()),
                    (
                        "api_key".to_string(),
                        "env:CONFAB_CHAT_TEST_UNSET_KEY".into(),
                    ),
                ]),
            },
            chat: Default::default(),
            export_dir: ".".to_string(),
        };

        let err = Chat::new(&config).err().unwrap();
        let message = format!("{err:#}");
        assert!(message.contains("CONFAB_CHAT_TEST_UNSET_KEY not found in environment variables"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingCredential(name)) if name == "CONFAB_CHAT_TEST_UNSET_KEY"
        ));
    }
}
