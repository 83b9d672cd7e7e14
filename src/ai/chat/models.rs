//! The core models for managing a stateful chat with an LLM.
use serde::{Deserialize, Serialize};

/// Shown in place of a formatted history before the first exchange
pub const EMPTY_HISTORY_MESSAGE: &str = "No conversation yet.";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in the conversation. Fields are private so a turn
/// can't be edited after it lands in a transcript.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    content: String,
    sequence: usize,
}

impl Turn {
    pub fn new(role: Role, content: &str, sequence: usize) -> Self {
        Self {
            role,
            content: content.to_string(),
            sequence,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 1-based position in the transcript
    pub fn sequence(&self) -> usize {
        self.sequence
    }
}

/// Ordered turns of a conversation. Insertion order is display order.
#[derive(Default, Debug)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, role: Role, content: &str) -> &Turn {
        let turn = Turn::new(role, content, self.0.len() + 1);
        self.0.push(turn);
        &self.0[self.0.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.0.iter()
    }

    /// Numbered, human readable rendering of every turn separated by
    /// a blank line.
    pub fn format(&self) -> String {
        if self.is_empty() {
            return EMPTY_HISTORY_MESSAGE.to_string();
        }

        self.iter()
            .enumerate()
            .map(|(idx, turn)| format!("{}. {}:\n{}\n", idx + 1, turn.role.label(), turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
