//! Completion client configuration.

use std::time::Duration;

use friendbot_core::{CompletionRequest, ConversationContext, Message, DEFAULT_HISTORY_WINDOW};

/// OpenRouter's OpenAI-compatible chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

pub const DEFAULT_MAX_TOKENS: u32 = 300;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Shape every OpenRouter key has.
pub const DEFAULT_CREDENTIAL_PREFIX: &str = "sk-or-v1-";

/// App name sent in the `X-Title` attribution header.
pub const DEFAULT_TITLE: &str = "Friendly Bot";

/// Persona instruction sent as the system entry of every request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly chatbot that talks like a close friend \
on a messaging app. Be casual, warm and supportive. You can reply in English or in Hinglish \
(a Hindi and English mix), matching the user. Keep replies short and conversational, and use \
an emoji now and then. Help with questions, give advice, or just chat.";

/// Completion client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the chat completions endpoint.
    pub endpoint: String,

    /// Target model identifier.
    pub model: String,

    /// Token ceiling for each reply.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Persona instruction.
    pub system_prompt: String,

    /// How many prior messages accompany each request.
    pub history_window: usize,

    /// Required credential prefix. `None` skips the shape check.
    pub credential_prefix: Option<String>,

    /// Whole-request timeout. A timed out call is a network error.
    pub request_timeout: Option<Duration>,

    /// `HTTP-Referer` attribution header.
    pub referer: Option<String>,

    /// `X-Title` attribution header.
    pub title: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            credential_prefix: Some(DEFAULT_CREDENTIAL_PREFIX.to_string()),
            request_timeout: Some(Duration::from_secs(60)),
            referer: None,
            title: Some(DEFAULT_TITLE.to_string()),
        }
    }
}

impl ClientConfig {
    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the reply token ceiling.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the persona instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set how many prior messages are sent.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Require (or, with `None`, stop requiring) a credential prefix.
    pub fn with_credential_prefix(mut self, prefix: Option<String>) -> Self {
        self.credential_prefix = prefix;
        self
    }

    /// Set or clear the request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the `HTTP-Referer` header.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Set or clear the `X-Title` header.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Build the request for one call, keeping only the last
    /// `history_window` messages of `history`.
    pub fn request_for(&self, user_text: &str, history: &[Message]) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            prior_turns: ConversationContext::from_history(history, self.history_window),
            user_text: user_text.to_string(),
            model_id: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}
