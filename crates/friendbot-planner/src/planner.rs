//! Chooses how each reply is produced.

use std::sync::Arc;

use tracing::{debug, info, warn};

use friendbot_client::CompletionClient;
use friendbot_core::{CannedResponder, Credential, CredentialState, Message, ReplyError};

/// Planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Answer unmatched text with "add a credential" when none is configured.
    pub credential_hint: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            credential_hint: true,
        }
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Canned table, no network.
    Canned,
    /// Remote model.
    Remote,
    /// No normal reply was possible; text is the canned message for this
    /// failure.
    Fallback(ReplyError),
}

impl ReplySource {
    /// Whether the reply was produced without a network round trip.
    pub fn is_offline(&self) -> bool {
        matches!(
            self,
            Self::Canned
                | Self::Fallback(ReplyError::NoCredential)
                | Self::Fallback(ReplyError::MalformedCredential { .. })
        )
    }
}

/// A planned bot reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn canned(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ReplySource::Canned,
        }
    }

    fn fallback(error: ReplyError) -> Self {
        Self {
            text: error.user_message(),
            source: ReplySource::Fallback(error),
        }
    }
}

/// Produces exactly one reply per user submission.
///
/// Stateless between calls: the credential and history are supplied by the
/// caller on every call, so concurrent plans never share mutable state.
#[derive(Clone)]
pub struct ResponsePlanner {
    client: Arc<dyn CompletionClient>,
    canned: CannedResponder,
}

impl ResponsePlanner {
    /// Create a planner delegating to `client`, with default settings.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_config(client, CannedResponder::new(), PlannerConfig::default())
    }

    /// Create a planner with an explicit canned responder and config.
    pub fn with_config(
        client: Arc<dyn CompletionClient>,
        canned: CannedResponder,
        config: PlannerConfig,
    ) -> Self {
        Self {
            client,
            canned: canned.with_credential_hint(config.credential_hint),
        }
    }

    /// The canned responder in use.
    pub fn canned(&self) -> &CannedResponder {
        &self.canned
    }

    /// Plan the reply to `user_text`.
    ///
    /// `user_text` is expected to be non-blank; the caller trims and rejects
    /// empty input. `history` holds the messages before this submission.
    pub async fn plan(
        &self,
        user_text: &str,
        credential: Option<&Credential>,
        history: &[Message],
    ) -> Reply {
        let Some(credential) = credential else {
            debug!("No credential, answering from canned table");
            return match self.canned.respond(user_text, CredentialState::Absent) {
                Ok(text) => Reply::canned(text),
                Err(error) => Reply::fallback(error),
            };
        };

        let outcome = self.client.complete(user_text, history, credential).await;

        match outcome.into_reply() {
            Ok(text) => {
                info!(chars = text.chars().count(), "Remote reply received");
                Reply {
                    text,
                    source: ReplySource::Remote,
                }
            }
            Err(error) => {
                warn!(error = %error, "Remote reply unavailable, using fallback text");
                Reply::fallback(error)
            }
        }
    }

    /// Reply text only. Never fails; every failure resolves to a string.
    pub async fn plan_reply(
        &self,
        user_text: &str,
        credential: Option<&Credential>,
        history: &[Message],
    ) -> String {
        self.plan(user_text, credential, history).await.text
    }
}
