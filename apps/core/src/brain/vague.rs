//! Vague-reply detection.
//!
//! Detects low-information replies ("idk", "not really") given in answer to
//! an assistant question, and produces the clarifying follow-up that
//! short-circuits the module-based banks.

/// Closed list of vague-reply phrases. A trimmed, lowercased message that is
/// equal to, or contained within, one of these counts as vague.
const VAGUE_REPLIES: &[&str] = &[
    "not really",
    "idk",
    "i don't know",
    "i dont know",
    "dunno",
    "nothing much",
    "nothing",
    "not sure",
    "maybe",
    "meh",
    "fine",
    "okay",
    "ok",
    "whatever",
];

const SCHOOL_CLARIFY: &str =
    "It sounds like school might be on your mind. Is there a class, an assignment, or a \
     teacher situation you'd like to talk through?";

const LIFE_CLARIFY: &str =
    "Life outside school matters just as much. Is something going on with friends, family, \
     or your own time that you'd like to unpack?";

const GENERIC_CLARIFY: &str =
    "That's okay, it can be hard to put into words. Is it more about school, or more about \
     life outside of it?";

/// Returns true when `message` is a vague follow-up to an assistant question.
///
/// Requires the previous assistant message to be present and to contain a
/// question mark; the current message must fall inside the closed vague
/// phrase list (substring membership, so "really" inside "not really" still
/// counts, matching the original behavior).
pub fn is_vague_follow_up(message: &str, last_assistant: Option<&str>) -> bool {
    let Some(last) = last_assistant else {
        return false;
    };
    if !last.contains('?') {
        return false;
    }

    let trimmed = message.trim().to_lowercase();
    if trimmed.is_empty() {
        return false;
    }

    VAGUE_REPLIES
        .iter()
        .any(|phrase| *phrase == trimmed || phrase.contains(trimmed.as_str()))
}

/// Builds the clarifying question for a vague reply.
///
/// Topic words in the message steer the follow-up ("school", "life");
/// anything else gets the generic prompt.
pub fn clarifying_question(message: &str) -> &'static str {
    let lowered = message.to_lowercase();

    if lowered.contains("school") {
        SCHOOL_CLARIFY
    } else if lowered.contains("life") {
        LIFE_CLARIFY
    } else {
        GENERIC_CLARIFY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_assistant_question() {
        assert!(is_vague_follow_up("idk", Some("How are you feeling today?")));
        assert!(!is_vague_follow_up("idk", Some("Tell me more about that.")));
        assert!(!is_vague_follow_up("idk", None));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert!(is_vague_follow_up("  IDK ", Some("Anything on your mind?")));
        assert!(is_vague_follow_up("Not Really", Some("Did that help?")));
    }

    #[test]
    fn test_substring_membership() {
        // "really" is contained within "not really" and still triggers.
        assert!(is_vague_follow_up("really", Some("Are you sure?")));
    }

    #[test]
    fn test_non_vague_messages_pass_through() {
        assert!(!is_vague_follow_up(
            "I failed my chemistry exam",
            Some("How are you feeling today?")
        ));
        assert!(!is_vague_follow_up("", Some("How are you?")));
    }

    #[test]
    fn test_topic_word_override() {
        assert_eq!(clarifying_question("nothing much, school stuff"), SCHOOL_CLARIFY);
        assert_eq!(clarifying_question("idk, life I guess"), LIFE_CLARIFY);
        assert_eq!(clarifying_question("nothing much"), GENERIC_CLARIFY);
    }
}
