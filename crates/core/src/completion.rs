use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl From<Role> for String {
    fn from(val: Role) -> Self {
        val.as_str().into()
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match &self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalized role name for display headers.
    pub fn title(&self) -> &'static str {
        match &self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single conversation entry. Serialized as `{"role": .., "content": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Everything the remote model needs for one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Builds the ordered message list: system prompt, the history window
    /// oldest first, then the new user message.
    pub fn new(
        model: &str,
        system_prompt: &str,
        history_window: &[Message],
        user_message: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        let mut messages = Vec::with_capacity(history_window.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(history_window.iter().cloned());
        messages.push(Message::user(user_message));

        Self {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
        }
    }

    /// The trailing user message of this request.
    pub fn user_message(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Boundary to a remote completion service.
///
/// One call maps to exactly one outbound request. Implementations never retry
/// and never stream; the full reply is awaited before returning.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_message_order() {
        let window = vec![Message::user("Hello"), Message::assistant("Hi there")];
        let request = CompletionRequest::new("m", "be nice", &window, "How are you?", 0.3, 64);

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.messages[0].content, "be nice");
        assert_eq!(request.user_message(), Some("How are you?"));
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 64);
        assert_eq!(request.model, "m");
    }

    #[test]
    fn test_message_serializes_as_role_content() {
        let json = serde_json::to_value(Message::assistant("ok")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "ok"}));
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::User.title(), "User");
        let s: String = Role::Assistant.into();
        assert_eq!(s, "assistant");
    }
}
