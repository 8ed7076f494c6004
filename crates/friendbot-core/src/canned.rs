//! Canned replies: the fixed response table and its matching rules.
//!
//! Rules are checked top to bottom against the lowercased user text using
//! substring matching; the first rule with a matching token wins.

use std::sync::Arc;

use crate::error::ReplyError;
use crate::random::{RandomSource, ThreadRandom};

/// First line of every new conversation.
pub const WELCOME: &str = "Heyy! 👋 Main tumhara friendly chatbot hu! Kya haal chaal? 😊";

/// Text for [`ReplyError::NoCredential`], the no-credential path's answer
/// when nothing else matched.
pub const NO_CREDENTIAL: &str = "API key nahi mila yaar! 😅 Pehle API key daal do settings mein.";

pub const GREETINGS: &[&str] = &[
    "Heyy! Kaise ho yaar? 😄",
    "Hi there! Sab badhiya? 🤗",
    "Hello ji! Kya scene hai? 👋",
    "Hey buddy! Kaise chal raha hai sab? 😊",
];

pub const WELLBEING: &[&str] = &[
    "Main ekdum mast hu! 😎 Tu bata, tera din kaisa gaya?",
    "Bas chill kar raha hu! Tum sunao, kya kar rahe ho? 🙂",
    "Sab badhiya hai mere paas! Tumhara kya scene hai? 😄",
];

pub const IDENTITY: &str =
    "Main hu tumhara friendly bot! 🤖 Tum mujhe koi bhi naam de sakte ho. Tumhara naam kya hai? 😊";

pub const WEATHER: &str = "Yaar main weather check nahi kar sakta, but I hope aaj ka din achha ho! ☀️ Tumhare yahan kaisa mausam hai? 🌤️";

pub const SADNESS: &str =
    "Aww yaar, kya hua? 😔 Share kar sakte ho mere saath. Sometimes baat karne se achha lagta hai! 💙";

pub const POSITIVITY: &str =
    "Yayy! That's amazing! 🎉 Mujhe bhi khushi hui sunke! Keep spreading those good vibes! ✨";

pub const FOOD: &str = "Ooh khana! 🍽️ Main toh bot hu but mujhe lagta hai ghar ka khana sabse best hota hai! Tumne kya khaya aaj? 😋";

pub const GENERIC: &[&str] = &[
    "Interesting! Tell me more about it 🤔",
    "Haan haan, bilkul! Aur kya chal raha hai? 😊",
    "Oh nice! Thanks for sharing that with me! 💫",
    "Sahi hai yaar! Aur batao kya scene hai? 🙌",
    "Cool cool! Main sun raha hu, continue karo! 👂",
    "Haha, mast hai! Aur kuch interesting hua aaj? 😄",
];

/// Topic recognised by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Greeting,
    Wellbeing,
    Identity,
    Weather,
    Sadness,
    Positivity,
    Food,
}

struct Rule {
    topic: Topic,
    tokens: &'static [&'static str],
    replies: &'static [&'static str],
}

// Order matters.
const RULES: &[Rule] = &[
    Rule {
        topic: Topic::Greeting,
        tokens: &["hello", "hi", "hey"],
        replies: GREETINGS,
    },
    Rule {
        topic: Topic::Wellbeing,
        tokens: &["how are you", "kaise ho", "kya haal"],
        replies: WELLBEING,
    },
    Rule {
        topic: Topic::Identity,
        tokens: &["name", "naam"],
        replies: &[IDENTITY],
    },
    Rule {
        topic: Topic::Weather,
        tokens: &["weather", "mausam"],
        replies: &[WEATHER],
    },
    Rule {
        topic: Topic::Sadness,
        tokens: &["sad", "upset", "down"],
        replies: &[SADNESS],
    },
    Rule {
        topic: Topic::Positivity,
        tokens: &["happy", "good", "great", "achha"],
        replies: &[POSITIVITY],
    },
    Rule {
        topic: Topic::Food,
        tokens: &["food", "khana", "eat"],
        replies: &[FOOD],
    },
];

/// Find the first topic whose tokens occur in `text`, ignoring case.
pub fn match_topic(text: &str) -> Option<Topic> {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.tokens.iter().any(|token| lower.contains(token)))
        .map(|rule| rule.topic)
}

/// Canned replies for a topic.
pub fn replies_for(topic: Topic) -> &'static [&'static str] {
    RULES
        .iter()
        .find(|rule| rule.topic == topic)
        .map(|rule| rule.replies)
        .unwrap_or(GENERIC)
}

/// Whether the caller has a credential for the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Present,
    Absent,
}

/// Picks canned replies without touching the network.
#[derive(Clone)]
pub struct CannedResponder {
    rng: Arc<dyn RandomSource>,
    credential_hint: bool,
}

impl CannedResponder {
    /// Responder using the thread RNG, with the credential hint enabled.
    pub fn new() -> Self {
        Self::with_random(Arc::new(ThreadRandom))
    }

    /// Responder using the given random source.
    pub fn with_random(rng: Arc<dyn RandomSource>) -> Self {
        Self {
            rng,
            credential_hint: true,
        }
    }

    /// Enable or disable the "add a credential" reply for unmatched text on
    /// the no-credential path. When disabled, the generic set is used.
    pub fn with_credential_hint(mut self, enabled: bool) -> Self {
        self.credential_hint = enabled;
        self
    }

    /// Reply to `text`.
    ///
    /// Unmatched text on the no-credential path resolves to
    /// [`ReplyError::NoCredential`] while the hint is enabled; its
    /// `user_message()` is the reply to show.
    pub fn respond(
        &self,
        text: &str,
        credential: CredentialState,
    ) -> Result<&'static str, ReplyError> {
        if let Some(topic) = match_topic(text) {
            return Ok(self.choose(replies_for(topic)));
        }
        if credential == CredentialState::Absent && self.credential_hint {
            return Err(ReplyError::NoCredential);
        }
        Ok(self.choose(GENERIC))
    }

    /// Uniform pick from a non-empty set.
    pub fn choose(&self, set: &'static [&'static str]) -> &'static str {
        set[self.rng.pick(set.len()).min(set.len().saturating_sub(1))]
    }

    /// The random source, shared with callers that need their own picks.
    pub fn random(&self) -> &Arc<dyn RandomSource> {
        &self.rng
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CannedResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CannedResponder")
            .field("credential_hint", &self.credential_hint)
            .finish_non_exhaustive()
    }
}
