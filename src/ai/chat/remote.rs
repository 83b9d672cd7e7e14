use std::sync::Arc;

use async_trait::async_trait;

use super::error::ChatError;

/// A running conversation on the remote API. Implementations keep
/// whatever context the API needs across exchanges.
#[async_trait]
pub trait RemoteChat: Send {
    /// Returns `Ok(None)` when the API answered but produced no text.
    async fn send_message(&mut self, text: &str) -> Result<Option<String>, ChatError>;
}

pub type BoxedRemoteChat = Box<dyn RemoteChat>;

/// A configured model that can open fresh conversations
pub trait ChatModel: Send + Sync {
    fn start_chat(&self) -> BoxedRemoteChat;
    fn model_name(&self) -> &str;
}

pub type SharedChatModel = Arc<dyn ChatModel>;
