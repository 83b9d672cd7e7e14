use std::sync::Arc;

use tokio::sync::Mutex;

use crate::ai::chat::{ConversationSession, SharedChatModel};
use crate::core::AppConfig;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    // The one conversation this process serves. Holding the lock for
    // the whole exchange keeps a second request from interleaving.
    pub session: Mutex<ConversationSession>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(model: SharedChatModel, config: AppConfig) -> Self {
        Self {
            session: Mutex::new(ConversationSession::new(model)),
            config,
        }
    }
}
