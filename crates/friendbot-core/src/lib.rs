//! Friendbot Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage
//! - Runtime specifics
//!
//! All types here represent the chat domain: messages, the caller-owned
//! conversation, credentials, completion requests/outcomes, the reply error
//! taxonomy and the canned-response table.

pub mod canned;
pub mod chat;
pub mod completion;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod ids;
pub mod random;

// Re-export commonly used types
pub use canned::{CannedResponder, CredentialState};
pub use chat::{ChatRole, Message};
pub use completion::{CompletionOutcome, CompletionRequest};
pub use conversation::{Conversation, ConversationContext, DEFAULT_HISTORY_WINDOW};
pub use credential::Credential;
pub use error::{CoreError, ReplyError};
pub use ids::MessageId;
pub use random::{FixedIndex, RandomSource, ThreadRandom};
