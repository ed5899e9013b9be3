#![cfg(test)]

//! Test utilities for chat modules

use crate::svc::chat::Chat;
use async_trait::async_trait;
use confab_core::completion::{CompletionGateway, CompletionRequest, GatewayError};
use confab_core::session::SessionConfig;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub type RecordedRequests = Arc<Mutex<Vec<CompletionRequest>>>;

/// A gateway that records every request and answers from a script.
///
/// Scripted replies are consumed in order; once exhausted the fallback reply
/// is used. A `None` entry fails that call.
pub struct RecordingGateway {
    script: Mutex<VecDeque<Option<String>>>,
    fallback: Option<String>,
    requests: RecordedRequests,
}

impl RecordingGateway {
    /// Always replies with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(text.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer the first call with the fallback reply and fail from then on.
    pub fn then_fail(mut self) -> Self {
        let first = self.fallback.take();
        self.script.get_mut().unwrap().push_back(first);
        self
    }

    pub fn requests(&self) -> RecordedRequests {
        self.requests.clone()
    }
}

#[async_trait]
impl CompletionGateway for RecordingGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.ok_or_else(|| GatewayError::Api {
            status: 500,
            message: "mock gateway failure".to_string(),
        })
    }
}

/// Creates a chat backed by `gateway` with default session parameters and a
/// temporary export directory.
pub fn create_test_chat(gateway: RecordingGateway) -> (Chat, RecordedRequests) {
    let requests = gateway.requests();
    let export_dir = tempfile::tempdir().unwrap();
    let chat = Chat::with_gateway(
        SessionConfig::default(),
        Box::new(gateway),
        export_dir.path().to_path_buf(),
    );
    // Keep the temp directory alive by leaking it (this is just for tests)
    let _ = Box::leak(Box::new(export_dir));
    (chat, requests)
}
