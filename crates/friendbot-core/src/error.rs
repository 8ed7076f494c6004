//! Core domain errors and the reply failure taxonomy.

use thiserror::Error;

use crate::canned::NO_CREDENTIAL;

/// Core domain errors for Friendbot.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Submitted text was empty or whitespace only.
    #[error("Empty input: nothing to send")]
    EmptyInput,
}

/// Every way producing a bot reply can fail.
///
/// None of these ever reach the conversation as a fault: each one has a
/// conversational [`user_message`](ReplyError::user_message) that is shown
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// No credential was supplied.
    #[error("no credential configured")]
    NoCredential,

    /// Credential does not have the expected shape.
    #[error("credential does not start with '{expected_prefix}'")]
    MalformedCredential { expected_prefix: String },

    /// Endpoint rejected the credential (401).
    #[error("credential rejected (HTTP 401)")]
    AuthError,

    /// Account has no balance left (402).
    #[error("quota exhausted (HTTP 402)")]
    QuotaExhausted,

    /// Endpoint is throttling us (429).
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    /// Any other failure status.
    #[error("service error (HTTP {0})")]
    ServiceError(u16),

    /// No usable response arrived.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Endpoint answered successfully with no content.
    #[error("empty reply")]
    EmptyReply,
}

impl ReplyError {
    /// Classify a failure status from the completion endpoint.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthError,
            402 => Self::QuotaExhausted,
            429 => Self::RateLimited,
            other => Self::ServiceError(other),
        }
    }

    /// Text shown in the conversation in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoCredential => NO_CREDENTIAL.to_string(),
            Self::MalformedCredential { expected_prefix } if expected_prefix.is_empty() => {
                "Yaar ye API key sahi nahi lag rahi! 🤔 Settings mein key dobara daalo.".to_string()
            }
            Self::MalformedCredential { expected_prefix } => format!(
                "Yaar ye API key sahi nahi lag rahi! 🤔 Settings mein woh key daalo jo '{}' se start hoti hai.",
                expected_prefix
            ),
            Self::AuthError => {
                "API key invalid hai yaar! 🔑 Settings mein jaake nayi key daalo - maybe expired ho gayi hai?"
                    .to_string()
            }
            Self::QuotaExhausted => {
                "Credits khatam ho gaye! 💸 Apne provider account mein balance add karo.".to_string()
            }
            Self::RateLimited => {
                "Bohot zyada requests kar diye! 😅 Thoda wait karo phir try karna.".to_string()
            }
            Self::ServiceError(status) => {
                format!("API error aa gaya: {}. 😔 Thoda baad try karna.", status)
            }
            Self::NetworkError(_) => {
                "Oops! Internet connection check karo aur thodi der mein fir try karna. 🤷‍♂️"
                    .to_string()
            }
            Self::EmptyReply => "Hmm, kuch samajh nahi aaya! 🤔 Fir se try karo.".to_string(),
        }
    }
}
