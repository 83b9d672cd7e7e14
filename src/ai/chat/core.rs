use chrono::{DateTime, Local};
use uuid::Uuid;

use super::error::ChatError;
use super::models::{Role, Transcript, Turn};
use super::remote::{BoxedRemoteChat, SharedChatModel};

/// Recorded as the assistant's reply when the API returns no text
pub const FALLBACK_RESPONSE: &str = "Sorry, no response could be generated.";

const STARTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The one active conversation of the process.
///
/// Every call to `send` records exactly two turns, the user's input
/// followed by the assistant's reply, whether the remote call succeeds
/// or not. Failures are turned into transcript content so the
/// conversation can carry on.
///
/// `send` and `reset` take `&mut self` so only one exchange can be in
/// flight at a time.
pub struct ConversationSession {
    id: Uuid,
    model: SharedChatModel,
    remote: BoxedRemoteChat,
    transcript: Transcript,
    started_at: DateTime<Local>,
}

impl ConversationSession {
    pub fn new(model: SharedChatModel) -> Self {
        let remote = model.start_chat();
        let id = Uuid::new_v4();
        tracing::debug!("Started chat session {} with model {}", id, model.model_name());

        Self {
            id,
            model,
            remote,
            transcript: Transcript::new(),
            started_at: Local::now(),
        }
    }

    /// Runs one exchange and returns the text recorded for the
    /// assistant.
    pub async fn send(&mut self, user_text: &str) -> String {
        // Record the input first so a failed call still shows what was asked
        self.transcript.push(Role::User, user_text);

        let reply = match self.remote.send_message(user_text).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => {
                tracing::warn!("Session {} received an empty response", self.id);
                FALLBACK_RESPONSE.to_string()
            }
            Err(e) => {
                tracing::error!("Session {} request failed: {}", self.id, e);
                error_reply(&e)
            }
        };

        self.transcript.push(Role::Assistant, &reply);
        reply
    }

    /// Drops the current conversation and starts a new one.
    pub fn reset(&mut self) {
        let remote = self.model.start_chat();
        let id = Uuid::new_v4();
        // Never let the start time move backwards if the wall clock does
        let started_at = Local::now().max(self.started_at);

        tracing::debug!("Reset chat session {} -> {}", self.id, id);

        self.id = id;
        self.remote = remote;
        self.transcript = Transcript::new();
        self.started_at = started_at;
    }

    pub fn history_view(&self) -> &[Turn] {
        self.transcript.turns()
    }

    pub fn format_history(&self) -> String {
        self.transcript.format()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn started_at_display(&self) -> String {
        self.started_at.format(STARTED_AT_FORMAT).to_string()
    }
}

fn error_reply(err: &ChatError) -> String {
    format!("An error occurred: {}", err)
}
