//! Chat-completion client for Friendbot.
//!
//! Builds the conversation payload for an OpenAI-compatible
//! `chat/completions` endpoint, sends exactly one request per call and maps
//! whatever comes back to a [`CompletionOutcome`](friendbot_core::CompletionOutcome).
//! No retries, no caching, no streaming.
//!
//! # Example
//!
//! ```rust,no_run
//! use friendbot_client::{ClientConfig, CompletionClient, HttpCompletionClient};
//! use friendbot_core::Credential;
//!
//! async fn ask() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpCompletionClient::new(ClientConfig::default())?;
//!     let credential = Credential::parse("sk-or-v1-...").ok_or("missing key")?;
//!
//!     let outcome = client.complete("hello", &[], &credential).await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod http;
mod types;

pub use client::CompletionClient;
pub use config::{
    ClientConfig, DEFAULT_CREDENTIAL_PREFIX, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DEFAULT_TITLE,
};
pub use error::ClientError;
pub use http::HttpCompletionClient;
pub use types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};
