//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, body::Body};

use gemchat::ai::chat::{BoxedRemoteChat, ChatError, ChatModel, RemoteChat, RequestErrorKind};
use gemchat::api::AppState;
use gemchat::api::app;
use gemchat::core::AppConfig;

/// How the stub model answers every message
#[derive(Clone, Copy)]
pub enum StubReply {
    /// Replies with "echo: {message}"
    Echo,
    /// Replies with no text
    Empty,
    /// Fails as if the API ran out of quota
    Fail,
}

pub struct StubModel(pub StubReply);

struct StubChat(StubReply);

#[async_trait]
impl RemoteChat for StubChat {
    async fn send_message(&mut self, text: &str) -> Result<Option<String>, ChatError> {
        match self.0 {
            StubReply::Echo => Ok(Some(format!("echo: {}", text))),
            StubReply::Empty => Ok(None),
            StubReply::Fail => Err(ChatError::request(
                RequestErrorKind::Quota,
                "HTTP 429: Resource has been exhausted",
            )),
        }
    }
}

impl ChatModel for StubModel {
    fn start_chat(&self) -> BoxedRemoteChat {
        Box::new(StubChat(self.0))
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        gemini_api_key: String::from("test-api-key"),
        gemini_api_hostname: String::from("http://localhost:1"),
        gemini_model: String::from("gemini-1.5-pro"),
        request_timeout_secs: 5,
        web_ui_path: format!("{}/web-ui", env!("CARGO_MANIFEST_DIR")),
    }
}

/// Creates a test application router backed by a stub model
pub fn test_app(reply: StubReply) -> Router {
    let app_state = AppState::new(Arc::new(StubModel(reply)), test_config());
    app(Arc::new(app_state))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let body = body_to_string(body).await;
    serde_json::from_str(&body).expect("Body is not valid JSON")
}
