//! A conversation paired with a planner, for presentation layers that want
//! one call per submission.

use tracing::debug;

use friendbot_core::{Conversation, CoreError, Credential, Message};

use crate::planner::{ReplySource, ResponsePlanner};

/// Conversation plus the planner that answers it.
///
/// Each accepted submission appends the user message and then, once the
/// reply is planned, exactly one bot message.
pub struct ChatSession {
    conversation: Conversation,
    planner: ResponsePlanner,
    credential: Option<Credential>,
}

impl ChatSession {
    /// Start a session with the welcome message.
    pub fn new(planner: ResponsePlanner, credential: Option<Credential>) -> Self {
        Self::with_conversation(Conversation::new(), planner, credential)
    }

    /// Continue an existing conversation.
    pub fn with_conversation(
        conversation: Conversation,
        planner: ResponsePlanner,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            conversation,
            planner,
            credential,
        }
    }

    /// Replace (or clear) the credential used for later submissions.
    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Submit user text and append the bot's reply.
    ///
    /// Blank input is rejected before anything is appended. The stored user
    /// message keeps the text as given; the planner sees it trimmed.
    pub async fn submit(&mut self, text: &str) -> Result<(Message, ReplySource), CoreError> {
        let prior = self.conversation.len();
        self.conversation.push_user(text)?;

        let history = &self.conversation.messages()[..prior];
        let reply = self
            .planner
            .plan(text.trim(), self.credential.as_ref(), history)
            .await;

        let message = self.conversation.push_bot(reply.text).clone();
        debug!(id = %message.id, source = ?reply.source, "Reply appended");
        Ok((message, reply.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use friendbot_client::CompletionClient;
    use friendbot_core::canned::GREETINGS;
    use friendbot_core::CompletionOutcome;

    /// Records the history length it was given and echoes the user text.
    #[derive(Default)]
    struct EchoClient {
        seen_history: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(
            &self,
            user_text: &str,
            history: &[Message],
            _credential: &Credential,
        ) -> CompletionOutcome {
            self.seen_history
                .lock()
                .unwrap()
                .push(history.iter().map(|m| m.text.clone()).collect());
            CompletionOutcome::Success(format!("echo: {}", user_text))
        }
    }

    #[tokio::test]
    async fn test_one_bot_message_per_submission() {
        let planner = ResponsePlanner::new(Arc::new(EchoClient::default()));
        let mut session = ChatSession::new(planner, None);

        let (reply, source) = session.submit("hello").await.unwrap();

        assert_eq!(source, ReplySource::Canned);
        assert!(reply.is_bot);
        assert!(GREETINGS.contains(&reply.text.as_str()));
        // welcome + user + bot
        assert_eq!(session.conversation().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_submission_appends_nothing() {
        let planner = ResponsePlanner::new(Arc::new(EchoClient::default()));
        let mut session = ChatSession::new(planner, None);

        assert!(matches!(session.submit("   ").await, Err(CoreError::EmptyInput)));
        assert_eq!(session.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_history_excludes_current_submission() {
        let client = Arc::new(EchoClient::default());
        let planner = ResponsePlanner::new(client.clone());
        let mut session = ChatSession::with_conversation(
            Conversation::empty(),
            planner,
            Credential::parse("sk-or-v1-abc"),
        );

        session.submit("first").await.unwrap();
        let (reply, source) = session.submit("second").await.unwrap();

        assert_eq!(source, ReplySource::Remote);
        assert_eq!(reply.text, "echo: second");
        let seen = client.seen_history.lock().unwrap().clone();
        assert_eq!(seen[0], Vec::<String>::new());
        assert_eq!(seen[1], vec!["first".to_string(), "echo: first".to_string()]);
    }

    #[tokio::test]
    async fn test_planner_sees_trimmed_text() {
        let planner = ResponsePlanner::new(Arc::new(EchoClient::default()));
        let mut session = ChatSession::new(planner, Credential::parse("sk-or-v1-abc"));

        let (reply, _) = session.submit("  padded \n").await.unwrap();

        assert_eq!(reply.text, "echo: padded");
        assert_eq!(session.conversation().messages()[1].text, "  padded \n");
    }

    #[tokio::test]
    async fn test_reply_ids_follow_user_ids() {
        let planner = ResponsePlanner::new(Arc::new(EchoClient::default()));
        let mut session = ChatSession::new(planner, Credential::parse("sk-or-v1-abc"));

        let (reply, _) = session.submit("hi").await.unwrap();
        let user = &session.conversation().messages()[1];

        assert!(!user.is_bot);
        assert!(reply.id > user.id);
    }

    #[tokio::test]
    async fn test_clearing_credential_switches_to_canned() {
        let planner = ResponsePlanner::new(Arc::new(EchoClient::default()));
        let mut session = ChatSession::new(planner, Credential::parse("sk-or-v1-abc"));

        let (_, source) = session.submit("hello").await.unwrap();
        assert_eq!(source, ReplySource::Remote);

        session.set_credential(None);
        let (_, source) = session.submit("hello").await.unwrap();
        assert_eq!(source, ReplySource::Canned);
    }
}
