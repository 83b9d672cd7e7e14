//! Stateful chat with a hosted LLM: the transcript model, the remote
//! chat capability, and the session that ties them together.
mod core;
mod error;
mod models;
mod remote;

pub use self::core::{ConversationSession, FALLBACK_RESPONSE};
pub use error::{ChatError, RequestErrorKind};
pub use models::{EMPTY_HISTORY_MESSAGE, Role, Transcript, Turn};
pub use remote::{BoxedRemoteChat, ChatModel, RemoteChat, SharedChatModel};
