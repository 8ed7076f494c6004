//! Wire types for the OpenAI-compatible chat completions API.

use serde::{Deserialize, Serialize};

use friendbot_core::{ChatRole, CompletionRequest};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One `{role, content}` entry.
#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: ChatRole,
    pub content: &'a str,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model_id,
            messages: request
                .messages()
                .into_iter()
                .map(|(role, content)| WireMessage { role, content })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// Successful response body. Only the fields we read are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// `choices[0].message.content`, or empty when any part is missing.
    pub fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}
