//! A session is the mutable state of one running chat: the conversation
//! history plus the parameters used for every request.
use crate::completion::{CompletionRequest, Message};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_HISTORY_WINDOW: usize = 5;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, respectful and honest assistant. \
Always provide accurate information and admit when you're not sure about something. \
Keep responses clear and concise unless asked for more detail.";

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Temperature must be between 0 and 1, got {0}")]
    TemperatureOutOfRange(f32),
    #[error("Invalid temperature value: '{0}'")]
    InvalidTemperature(String),
    #[error("Assistant response is empty")]
    EmptyResponse,
}

/// Request parameters for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Number of trailing history messages sent with each request.
    pub history_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

/// Conversation history and request parameters for one chat.
///
/// History only grows by whole turns: a user message is stored together with
/// the assistant reply that answered it, never alone.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    history: Vec<Message>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            history: Vec::new(),
        }
    }

    /// Append a completed turn to the history.
    pub fn append_turn(&mut self, user: &str, assistant: &str) -> Result<(), SessionError> {
        if assistant.trim().is_empty() {
            return Err(SessionError::EmptyResponse);
        }
        self.history.push(Message::user(user));
        self.history.push(Message::assistant(assistant));
        Ok(())
    }

    /// Clear the conversation history. Parameters are kept.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn set_temperature(&mut self, value: f32) -> Result<(), SessionError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SessionError::TemperatureOutOfRange(value));
        }
        self.config.temperature = value;
        Ok(())
    }

    pub fn set_system_prompt(&mut self, prompt: &str) {
        self.config.system_prompt = prompt.to_string();
    }

    /// Last `n` messages of the history, oldest first.
    pub fn recent_window(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Build the request for a new user message using the configured window.
    pub fn build_request(&self, user_message: &str) -> CompletionRequest {
        CompletionRequest::new(
            &self.config.model,
            &self.config.system_prompt,
            self.recent_window(self.config.history_window),
            user_message,
            self.config.temperature,
            self.config.max_tokens,
        )
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn temperature(&self) -> f32 {
        self.config.temperature
    }

    pub fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.config.max_tokens
    }

    pub fn history_window(&self) -> usize {
        self.config.history_window
    }
}

/// Parse a user supplied temperature. Range checks happen in
/// [`Session::set_temperature`].
pub fn parse_temperature(raw: &str) -> Result<f32, SessionError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| SessionError::InvalidTemperature(raw.trim().to_string()))
}
