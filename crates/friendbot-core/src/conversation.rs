//! Caller-owned conversation transcript and the bounded context sent upstream.

use crate::canned::WELCOME;
use crate::chat::Message;
use crate::error::CoreError;
use crate::ids::MessageId;

/// Number of prior messages carried into a completion request.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// The visible thread of messages.
///
/// Append only: messages are never edited or removed, and each gets the next
/// id from a per-conversation counter.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl Conversation {
    /// Start a conversation with the bot's welcome line.
    pub fn new() -> Self {
        let mut conversation = Self::empty();
        conversation.push_bot(WELCOME);
        conversation
    }

    /// Start a conversation with no messages.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            next_id: MessageId::new(1),
        }
    }

    /// Append a user submission.
    ///
    /// Whitespace-only input is rejected; accepted text is stored as given.
    pub fn push_user(&mut self, text: impl Into<String>) -> Result<&Message, CoreError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CoreError::EmptyInput);
        }
        Ok(self.push(Message::user(self.next_id, text)))
    }

    /// Append a bot reply.
    pub fn push_bot(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message::bot(self.next_id, text))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.next_id = self.next_id.next();
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Snapshot of the last `window` messages, oldest first.
    pub fn context(&self, window: usize) -> ConversationContext {
        ConversationContext::from_history(&self.messages, window)
    }

    /// All messages in creation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered slice of recent messages, oldest first.
///
/// Older messages are dropped, never summarized. The snapshot is owned, so a
/// call in flight is unaffected by later appends to the conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    messages: Vec<Message>,
}

impl ConversationContext {
    /// Keep the last `window` entries of `history`, preserving order.
    pub fn from_history(history: &[Message], window: usize) -> Self {
        let start = history.len().saturating_sub(window);
        Self {
            messages: history[start..].to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
