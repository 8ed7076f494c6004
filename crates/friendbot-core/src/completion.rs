//! Completion request/outcome types shared by the client and the planner.

use crate::chat::ChatRole;
use crate::conversation::ConversationContext;
use crate::error::ReplyError;

/// Everything one call to the completion endpoint carries.
///
/// Built per call and dropped when the call resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Persona instruction sent as the leading system entry.
    pub system_prompt: String,
    /// Recent history, oldest first.
    pub prior_turns: ConversationContext,
    /// The new user submission.
    pub user_text: String,
    /// Target model identifier.
    pub model_id: String,
    /// Token ceiling for the reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Ordered `(role, content)` entries: system, prior turns, new user turn.
    pub fn messages(&self) -> Vec<(ChatRole, &str)> {
        let mut entries = Vec::with_capacity(self.prior_turns.len() + 2);
        entries.push((ChatRole::System, self.system_prompt.as_str()));
        entries.extend(
            self.prior_turns
                .iter()
                .map(|message| (message.role(), message.text.as_str())),
        );
        entries.push((ChatRole::User, self.user_text.as_str()));
        entries
    }
}

/// Result of one round trip to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Endpoint answered; the text may be empty.
    Success(String),
    /// Endpoint answered with a failure status.
    HttpError { status: u16, body: String },
    /// No usable response was received.
    NetworkError(String),
    /// Credential failed the shape check; nothing was sent.
    MalformedCredential { expected_prefix: String },
}

impl CompletionOutcome {
    /// Reply text, or the classified failure.
    ///
    /// A blank success is reported as [`ReplyError::EmptyReply`].
    pub fn into_reply(self) -> Result<String, ReplyError> {
        match self {
            Self::Success(text) if text.trim().is_empty() => Err(ReplyError::EmptyReply),
            Self::Success(text) => Ok(text),
            Self::HttpError { status, .. } => Err(ReplyError::from_status(status)),
            Self::NetworkError(cause) => Err(ReplyError::NetworkError(cause)),
            Self::MalformedCredential { expected_prefix } => {
                Err(ReplyError::MalformedCredential { expected_prefix })
            }
        }
    }
}
