//! The seam between the reply planner and the completion transport.

use async_trait::async_trait;

use friendbot_core::{CompletionOutcome, Credential, Message};

/// One round trip to a chat-completion endpoint.
///
/// Implement this to plug in another transport, or a stub in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Ask the model for a reply to `user_text`.
    ///
    /// `history` holds the prior messages, oldest first; implementations send
    /// only the most recent window of it. Never fails: every outcome,
    /// including transport failure, is a [`CompletionOutcome`] variant.
    async fn complete(
        &self,
        user_text: &str,
        history: &[Message],
        credential: &Credential,
    ) -> CompletionOutcome;
}
