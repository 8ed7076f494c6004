//! Chat message types for the visible conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;

/// Role of a message as seen by the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// User message (input/prompt).
    User,
    /// Assistant message (response).
    Assistant,
    /// System message (instructions).
    System,
}

/// A message in the conversation.
///
/// Messages are immutable once created; the conversation only ever appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identity of this message, increasing in creation order.
    pub id: MessageId,
    /// Message text, stored as submitted.
    pub text: String,
    /// Whether the bot authored this message.
    pub is_bot: bool,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time.
    pub fn new(id: MessageId, text: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_bot,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, text, false)
    }

    /// Create a bot message.
    pub fn bot(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, text, true)
    }

    /// Role this message plays in a completion request.
    pub fn role(&self) -> ChatRole {
        if self.is_bot {
            ChatRole::Assistant
        } else {
            ChatRole::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        assert_eq!(Message::bot(MessageId::new(1), "hi").role(), ChatRole::Assistant);
        assert_eq!(Message::user(MessageId::new(2), "hi").role(), ChatRole::User);
    }
}
