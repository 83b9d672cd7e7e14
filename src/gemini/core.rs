use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::chat::{BoxedRemoteChat, ChatError, ChatModel, RemoteChat, RequestErrorKind};

pub const DEFAULT_API_HOSTNAME: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

// Raw bodies end up in the transcript when they explain a failure
const MAX_ERROR_BODY_CHARS: usize = 200;

// {
//   "contents": [
//     {"role": "user", "parts": [{"text": "Hello"}]},
//     {"role": "model", "parts": [{"text": "Hi there"}]}
//   ]
// }
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    pub fn user(text: &str) -> Self {
        Self::new("user", text)
    }

    pub fn model(text: &str) -> Self {
        Self::new("model", text)
    }

    fn new(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }

    /// All text parts joined together
    fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .concat()
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
    #[allow(dead_code)]
    code: Option<i32>,
    #[allow(dead_code)]
    status: Option<String>,
}

/// A Gemini model reachable through the `generateContent` endpoint.
///
/// Cheap to clone, the underlying HTTP client is reference counted.
#[derive(Clone, Debug)]
pub struct GeminiModel {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
}

impl GeminiModel {
    pub fn new(
        api_hostname: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(ChatError::ModelInit("Model name is empty".to_string()));
        }
        if model.contains(|c: char| c == '/' || c == ':' || c.is_whitespace()) {
            return Err(ChatError::ModelInit(format!(
                "Invalid model name: {}",
                model
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::ModelInit(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_hostname, self.model
        )
    }

    /// Sends the full conversation and returns the generated text,
    /// `None` if the model produced nothing.
    pub async fn generate_content(&self, contents: &[Content]) -> Result<Option<String>, ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest { contents })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::network(format!("Request timeout: {}", e))
                } else if e.is_connect() {
                    ChatError::network(format!("Connection failed: {}", e))
                } else {
                    ChatError::network(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }

        let resp: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Unparseable generateContent response: {}", body);
            ChatError::invalid_response(format!("Failed to parse response: {}", e))
        })?;

        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ChatError::invalid_response(format!(
                "Prompt was blocked: {}",
                reason
            )));
        }

        let text = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.text())
            .filter(|t| !t.is_empty());

        Ok(text)
    }
}

fn classify_error(status: u16, body: &str) -> ChatError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            tracing::debug!("HTTP {} error body: {}", status, body);
            truncate(body, MAX_ERROR_BODY_CHARS)
        });

    let kind = match status {
        400 | 404 => RequestErrorKind::InvalidRequest,
        401 | 403 => RequestErrorKind::Auth,
        429 => RequestErrorKind::Quota,
        500..=599 => RequestErrorKind::Server,
        _ => RequestErrorKind::InvalidResponse,
    };

    ChatError::request(kind, format!("HTTP {}: {}", status, message))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

impl ChatModel for GeminiModel {
    fn start_chat(&self) -> BoxedRemoteChat {
        Box::new(GeminiChat::new(self.clone()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// A multi-turn conversation with Gemini. The API is stateless so
/// the history of completed exchanges is sent with every request.
pub struct GeminiChat {
    model: GeminiModel,
    history: Vec<Content>,
}

impl GeminiChat {
    pub fn new(model: GeminiModel) -> Self {
        Self {
            model,
            history: Vec::new(),
        }
    }

    #[cfg(test)]
    fn history(&self) -> &[Content] {
        &self.history
    }
}

#[async_trait]
impl RemoteChat for GeminiChat {
    async fn send_message(&mut self, text: &str) -> Result<Option<String>, ChatError> {
        let mut contents = self.history.clone();
        contents.push(Content::user(text));

        let reply = self.model.generate_content(&contents).await?;

        // Only completed exchanges are kept, the API rejects empty parts
        if let Some(reply_text) = &reply {
            contents.push(Content::model(reply_text));
            self.history = contents;
        }

        Ok(reply)
    }
}
