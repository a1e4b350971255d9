//! # Brain Module
//!
//! Rule-based response selection for StudyBalance. Takes a raw user message
//! (plus optional history and the previous assistant message) and
//! deterministically selects one of a fixed library of canned responses.
//! No model calls happen here; everything is pure and synchronous.
//!
//! ## Components
//! - `topic`: keyword classification and module selection
//! - `character`: mood/directness/verbosity/emotion inference from history
//! - `vague`: low-information follow-up detection
//! - `banks`: static response banks and the deterministic selection law
//! - `composer`: orchestration of the above into one response

pub mod banks;
pub mod character;
pub mod composer;
pub mod topic;
pub mod vague;

// Re-export the main types for callers outside the brain.
#[allow(unused_imports)]
pub use character::{Directness, Emotion, Mood, UserCharacter, Verbosity};
#[allow(unused_imports)]
pub use composer::{compose, ChatMessage, ComposedResponse, InteractionLog, Sender};
#[allow(unused_imports)]
pub use topic::{ConversationModule, TopicClassifier};
