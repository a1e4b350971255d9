//! Response composition.
//!
//! Orchestrates character inference, module selection, vague-reply handling,
//! and the response banks into one final response string. The whole pipeline
//! is a pure function of its inputs: no I/O, no hidden state, identical
//! inputs always produce identical output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::banks;
use super::character::{self, Directness, Emotion, Mood};
use super::topic::{ConversationModule, TopicClassifier};
use super::vague;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of conversation history. Insertion order is chronological,
/// most recent last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// Result of composing a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedResponse {
    /// The response text. Always non-empty.
    pub content: String,
    /// Module the message was routed to.
    pub module: ConversationModule,
    /// Character count of the incoming message, the value fed into the
    /// deterministic variant selection.
    pub characters_considered: usize,
}

/// Phrases that request clarification of a previous answer.
const CLARIFY_PHRASES: &[&str] = &[
    "explain",
    "why",
    "how",
    "what do you mean",
    "don't understand",
    "dont understand",
    "confused",
    "unsure",
    "not sure",
];

/// Subset of clarification phrases expressing uncertainty rather than a
/// request to elaborate.
const UNSURE_PHRASES: &[&str] = &["unsure", "not sure", "don't know", "dont know"];

const CLARIFY_PREFIX: &str = "Of course - here's what I meant earlier: \"";
const CLARIFY_SUFFIX: &str = "\" Does that make it clearer?";

const UNSURE_MESSAGE: &str =
    "It's completely fine not to be sure. We can take it one small question at a time; \
     what's the first thing on your mind?";

/// Significant-word length cutoff for the topic-continuity overlap check.
const CONTINUITY_MIN_WORD_LEN: usize = 4;

fn significant_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| w.chars().count() >= CONTINUITY_MIN_WORD_LEN)
        .collect()
}

fn last_user_text(history: &[ChatMessage]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
}

fn last_assistant_text(history: &[ChatMessage]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|m| m.sender == Sender::Assistant)
        .map(|m| m.text.as_str())
}

/// Composes the canned response for a message.
///
/// `last_assistant` is the assistant message the user is replying to; when
/// absent it is resolved from history. States are evaluated in a fixed
/// order and the first match returns:
///
/// 1. statement acknowledgement (message ends in '.'),
/// 2. clarification request,
/// 3. topic continuity,
/// 4. vague-reply short-circuit,
/// 5. module bank lookup,
/// 6. character-driven override, then the general bank.
///
/// Malformed or empty input degrades to a fixed supportive fallback; this
/// function never fails.
pub fn compose(
    message: &str,
    history: &[ChatMessage],
    last_assistant: Option<&str>,
) -> ComposedResponse {
    let characters_considered = message.chars().count();

    let trimmed = message.trim();
    if trimmed.is_empty() {
        return ComposedResponse {
            content: banks::FALLBACK_RESPONSE.to_string(),
            module: ConversationModule::General,
            characters_considered,
        };
    }

    let character = character::infer(history);
    let module = TopicClassifier::select(message, &character);
    let lowered = message.to_lowercase();
    let last_assistant = last_assistant
        .filter(|s| !s.trim().is_empty())
        .or_else(|| last_assistant_text(history));

    let done = |content: String| ComposedResponse {
        content,
        module,
        characters_considered,
    };

    // State 1: statements get an acknowledgement, not an answer.
    if trimmed.ends_with('.') {
        return done(banks::statement_acknowledgement(module).to_string());
    }

    // State 2: the user wants the previous answer unpacked.
    if history.len() >= 2 && CLARIFY_PHRASES.iter().any(|p| lowered.contains(p)) {
        if let Some(previous) = last_assistant {
            return done(format!("{CLARIFY_PREFIX}{previous}{CLARIFY_SUFFIX}"));
        }
        if UNSURE_PHRASES.iter().any(|p| lowered.contains(p)) {
            return done(UNSURE_MESSAGE.to_string());
        }
        // A bare explain/why/how with nothing to elaborate falls through.
    }

    // State 3: the user is continuing an earlier thread.
    if let Some(previous_user) = last_user_text(history) {
        let current_words = significant_words(message);
        let overlaps = significant_words(previous_user)
            .iter()
            .any(|w| current_words.contains(w));
        if overlaps {
            return done(format!(
                "Earlier you mentioned \"{previous_user}\". How has that been going since?"
            ));
        }
    }

    // State 4: vague replies to a question get a clarifying follow-up.
    if vague::is_vague_follow_up(message, last_assistant) {
        return done(vague::clarifying_question(message).to_string());
    }

    // State 5: topic-specific bank.
    if module != ConversationModule::General {
        return done(banks::pick(banks::bank_for(module), message).to_string());
    }

    // State 6: character-driven overrides, then the general bank.
    if character.directness == Directness::Direct {
        return done(banks::DIRECT_RESPONSE.to_string());
    }
    if character.mood == Mood::Positive {
        return done(banks::POSITIVE_RESPONSE.to_string());
    }
    if character.emotion == Emotion::Emotional {
        return done(banks::EMOTIONAL_RESPONSE.to_string());
    }

    done(banks::pick(banks::GENERAL_RESPONSES, message).to_string())
}

/// Maximum number of interactions retained in an [`InteractionLog`].
pub const INTERACTION_LOG_CAP: usize = 10;

/// One recorded exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub input: String,
    pub output: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded ring buffer of recent interactions.
///
/// Owned by whoever drives the engine (one per engine instance here), never
/// process-global. Oldest entries are evicted once the cap is reached.
#[derive(Debug)]
pub struct InteractionLog {
    entries: VecDeque<Interaction>,
    cap: usize,
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::new(INTERACTION_LOG_CAP)
    }
}

impl InteractionLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Records an exchange, evicting the oldest entry when full.
    pub fn record(&mut self, input: &str, output: &str) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(Interaction {
            input: input.to_string(),
            output: output.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Interaction> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }
}
