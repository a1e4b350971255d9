//! User character inference.
//!
//! Derives coarse mood/directness/verbosity/emotion tags from the most
//! recent user message in history. The result lives for one request only and
//! is never persisted as authoritative state.

use serde::{Deserialize, Serialize};

use super::composer::{ChatMessage, Sender};

/// Apparent mood of the latest user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Whether the user writes in short bursts or longer sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directness {
    Direct,
    #[default]
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Verbose,
    #[default]
    Concise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Emotional,
    #[default]
    Neutral,
}

/// Per-request descriptors of the user's apparent tone.
///
/// `Default` yields the all-neutral character: the unmarked variant of each
/// axis, so none of the composer's character overrides fire for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserCharacter {
    pub mood: Mood,
    pub directness: Directness,
    pub verbosity: Verbosity,
    pub emotion: Emotion,
}

const POSITIVE_WORDS: &[&str] = &[
    "great", "good", "happy", "excited", "awesome", "glad", "love", "thankful", "proud",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "bad", "awful", "stressed", "angry", "upset", "terrible", "hate", "miserable",
];

const EMOTION_WORDS: &[&str] = &[
    "feel", "feeling", "felt", "cry", "crying", "scared", "afraid", "lonely", "heart",
];

/// Words shorter than this count as direct phrasing.
const DIRECT_WORD_LIMIT: usize = 8;

/// Messages longer than this many characters count as verbose.
const VERBOSE_CHAR_THRESHOLD: usize = 80;

/// Infers a [`UserCharacter`] from conversation history.
///
/// Fewer than two messages, or a history with no user-sent message, yields
/// the all-neutral default. Otherwise only the last user message is
/// inspected; the four sub-decisions are independent.
pub fn infer(history: &[ChatMessage]) -> UserCharacter {
    if history.len() < 2 {
        return UserCharacter::default();
    }

    let Some(last_user) = history.iter().rev().find(|m| m.sender == Sender::User) else {
        return UserCharacter::default();
    };

    let lowered = last_user.text.to_lowercase();

    // Positive is checked first, so positive wins when both sets match.
    let mood = if POSITIVE_WORDS.iter().any(|w| lowered.contains(w)) {
        Mood::Positive
    } else if NEGATIVE_WORDS.iter().any(|w| lowered.contains(w)) {
        Mood::Negative
    } else {
        Mood::Neutral
    };

    let directness = if last_user.text.split_whitespace().count() < DIRECT_WORD_LIMIT {
        Directness::Direct
    } else {
        Directness::Verbose
    };

    let verbosity = if last_user.text.chars().count() > VERBOSE_CHAR_THRESHOLD {
        Verbosity::Verbose
    } else {
        Verbosity::Concise
    };

    let emotion = if EMOTION_WORDS.iter().any(|w| lowered.contains(w)) {
        Emotion::Emotional
    } else {
        Emotion::Neutral
    };

    UserCharacter {
        mood,
        directness,
        verbosity,
        emotion,
    }
}
