//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::chat::{ConversationSession, Turn};

#[derive(Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub transcript: Vec<Turn>,
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub started_at: String,
    pub transcript: Vec<Turn>,
}

impl SessionResponse {
    pub fn new(session: &ConversationSession) -> Self {
        Self {
            session_id: session.id().to_string(),
            started_at: session.started_at_display(),
            transcript: session.history_view().to_vec(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct HistoryResponse {
    pub started_at: String,
    pub history: String,
}
