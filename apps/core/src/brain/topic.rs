//! Topic classification using keyword sets.
//!
//! Maps a lowercased message to zero-or-one conversation module using fixed
//! keyword lists checked in a fixed priority order. Matching is substring
//! containment, not word-boundary matching, so "exams" hits "exam".

use serde::{Deserialize, Serialize};
use std::fmt;

use super::character::{Mood, UserCharacter};

/// Coarse topic category assigned to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationModule {
    StudySupport,
    EmotionalSupport,
    Motivation,
    Wellbeing,
    TimeManagement,
    General,
}

impl ConversationModule {
    /// Returns the wire/log label for this module.
    pub fn label(&self) -> &'static str {
        match self {
            ConversationModule::StudySupport => "study_support",
            ConversationModule::EmotionalSupport => "emotional_support",
            ConversationModule::Motivation => "motivation",
            ConversationModule::Wellbeing => "wellbeing",
            ConversationModule::TimeManagement => "time_management",
            ConversationModule::General => "general",
        }
    }
}

impl fmt::Display for ConversationModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Keyword sets in priority order. Earlier entries win when a message
/// matches several topics, so the order here is load-bearing.
const TOPIC_KEYWORDS: &[(ConversationModule, &[&str])] = &[
    (
        ConversationModule::StudySupport,
        &[
            "study", "studying", "homework", "assignment", "exam", "test", "revision", "essay",
            "grade", "class",
        ],
    ),
    (
        ConversationModule::EmotionalSupport,
        &[
            "stress", "stressed", "anxiety", "anxious", "overwhelmed", "pressure", "worried",
            "sad", "upset", "lonely",
        ],
    ),
    (
        ConversationModule::Motivation,
        &[
            "motivation", "motivated", "give up", "giving up", "procrastinat", "lazy", "stuck",
            "pointless",
        ],
    ),
    (
        ConversationModule::Wellbeing,
        &[
            "sleep", "tired", "exhausted", "break", "rest", "burnout", "health", "exercise",
            "relax",
        ],
    ),
    (
        ConversationModule::TimeManagement,
        &[
            "time", "schedule", "plan", "organize", "organise", "deadline", "busy", "manage",
        ],
    ),
];

/// Classifies messages into topics via ordered keyword sets.
pub struct TopicClassifier;

impl TopicClassifier {
    /// Returns the first topic whose keyword set intersects the message,
    /// or `None` when nothing matches.
    pub fn classify(message: &str) -> Option<ConversationModule> {
        let lowered = message.to_lowercase();

        for (module, keywords) in TOPIC_KEYWORDS {
            if keywords.iter().any(|kw| lowered.contains(kw)) {
                return Some(*module);
            }
        }

        None
    }

    /// Selects the conversation module for a message.
    ///
    /// Keyword priority first; a negative mood with no keyword hit routes to
    /// emotional support, everything else falls back to general. The
    /// two-stage policy means a neutral no-hit message and a negative no-hit
    /// message land in different modules.
    pub fn select(message: &str, character: &UserCharacter) -> ConversationModule {
        if let Some(module) = Self::classify(message) {
            return module;
        }

        if character.mood == Mood::Negative {
            return ConversationModule::EmotionalSupport;
        }

        ConversationModule::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_keywords() {
        assert_eq!(
            TopicClassifier::classify("I have an exam tomorrow"),
            Some(ConversationModule::StudySupport)
        );
        assert_eq!(
            TopicClassifier::classify("so much HOMEWORK tonight"),
            Some(ConversationModule::StudySupport)
        );
    }

    #[test]
    fn test_priority_order_study_beats_emotional() {
        // Contains both "exam" (study) and "overwhelmed" (emotional);
        // study is earlier in the priority list and must win.
        assert_eq!(
            TopicClassifier::classify("I have an exam and feel overwhelmed"),
            Some(ConversationModule::StudySupport)
        );
    }

    #[test]
    fn test_substring_containment() {
        // "procrastinat" matches inside "procrastinating".
        assert_eq!(
            TopicClassifier::classify("I keep procrastinating"),
            Some(ConversationModule::Motivation)
        );
        // "test" matches inside "latest" as well; substring matching is
        // deliberate and must not be tightened to word boundaries.
        assert_eq!(
            TopicClassifier::classify("did you see the latest news"),
            Some(ConversationModule::StudySupport)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(TopicClassifier::classify("hello there"), None);
        assert_eq!(TopicClassifier::classify(""), None);
    }

    #[test]
    fn test_mood_fallback() {
        let negative = UserCharacter {
            mood: Mood::Negative,
            ..UserCharacter::default()
        };
        assert_eq!(
            TopicClassifier::select("everything is awful today", &negative),
            ConversationModule::EmotionalSupport
        );

        let neutral = UserCharacter::default();
        assert_eq!(
            TopicClassifier::select("hello there", &neutral),
            ConversationModule::General
        );
    }
}
