//! Static response banks.
//!
//! Each conversation module maps to a fixed, ordered list of candidate
//! responses. Selection is deterministic: the character count of the raw,
//! original-case message modulo the bank size. The counts and ordering of
//! these lists are load-bearing; adding or removing an entry shifts every
//! subsequent mapping for that module.

use super::topic::ConversationModule;

pub const STUDY_RESPONSES: &[&str] = &[
    "Effective studying is about quality over quantity. Try active recall: close your notes \
     and explain the concept out loud as if you were teaching it. If you can't explain it \
     simply, that's the part to revisit.",
    "Break the work into 25-minute focused sessions with 5-minute breaks in between. Your \
     brain needs those pauses to consolidate what you just covered, and you'll stay fresher \
     for longer.",
    "Instead of rereading, try summarizing each topic in your own words or sketching a quick \
     mind map. Rewriting material in a new form makes it stick far better than passive review.",
];

pub const EMOTIONAL_RESPONSES: &[&str] = &[
    "What you're feeling is completely valid, and you're not alone in it. Try a slow \
     breathing pattern: in for four counts, hold for four, out for four. Even one minute of \
     that can take the edge off.",
    "When everything feels like too much, try the 5-4-3-2-1 grounding technique: name five \
     things you can see, four you can touch, three you can hear, two you can smell, and one \
     you can taste. It brings you back to the present.",
    "Pressure is real, but your worth isn't defined by grades. Step away for a ten-minute \
     walk, message a friend, or just get a glass of water. Small resets count more than they \
     seem to.",
    "It's okay to ask for help when things get heavy. Talking to a friend, a family member, \
     or a counselor isn't a weakness; it's one of the most effective things you can do.",
];

pub const MOTIVATION_RESPONSES: &[&str] = &[
    "Remember why you started. Break the overwhelming task into the smallest next step you \
     can actually do in ten minutes, do that one step, and let momentum carry you from there.",
    "Moments of doubt are normal; every student has them. Progress isn't linear, and a rough \
     day doesn't erase the ground you've already covered. Showing up at all is the win today.",
    "Don't compare your chapter three to someone else's chapter twenty. Focus on your own \
     pace, celebrate small completions, and be a little kinder to yourself than you were \
     yesterday.",
];

pub const WELLBEING_RESPONSES: &[&str] = &[
    "Sleep is your superpower. Aim for 7-9 hours and keep the schedule consistent; your \
     brain consolidates what you learned while you sleep, so rest literally is studying.",
    "Breaks aren't wasted time, they're maintenance. Stretch, step outside, listen to one \
     favorite song. Even five minutes away from the desk restores more focus than pushing \
     through.",
    "Your body fuels your mind. Twenty minutes of movement, a real meal, and some water will \
     do more for your concentration right now than another hour of grinding would.",
];

pub const TIME_RESPONSES: &[&str] = &[
    "Try time-blocking: give each task a specific slot in your day, include buffer time for \
     surprises, and schedule the breaks too. A plan with slack in it is a plan you can keep.",
    "List everything, then sort it: urgent and important first, important but not urgent \
     next. Half the stress of a busy week is carrying the list in your head instead of on \
     paper.",
    "Use the two-minute rule: if something takes less than two minutes, do it immediately. \
     For the rest, pick your top three priorities for the day and protect time for those \
     before anything else.",
];

pub const GENERAL_RESPONSES: &[&str] = &[
    "That's a great question. Everyone's balance looks different, so it's worth \
     experimenting: small changes, one at a time, and keep what works. What part of your \
     routine feels most off right now?",
    "I'm glad you reached out. There's no one-size-fits-all answer, but telling me a bit \
     more about your situation would help me point you somewhere useful.",
    "You're asking the right things. Finding a rhythm between school and the rest of life is \
     a skill, and it gets easier with practice. Where would you like to start?",
];

/// Per-module acknowledgement used when the user makes a statement rather
/// than asking a question. Distinct from the question-path banks above.
pub fn statement_acknowledgement(module: ConversationModule) -> &'static str {
    match module {
        ConversationModule::StudySupport => {
            "That sounds like a lot of schoolwork to carry. Thanks for telling me; if you'd \
             like, we can break it down together or look at study techniques that fit."
        }
        ConversationModule::EmotionalSupport => {
            "Thank you for sharing that; it takes courage to say it out loud. I'm here, and \
             whatever you're feeling right now is valid."
        }
        ConversationModule::Motivation => {
            "I hear you, and it's completely normal for drive to come and go. You've pushed \
             through before, and that counts for something."
        }
        ConversationModule::Wellbeing => {
            "It sounds like your body is asking for some care. Noticing that is already a \
             good first step."
        }
        ConversationModule::TimeManagement => {
            "That does sound like a packed schedule. Getting it all out in the open is the \
             first step toward making it manageable."
        }
        ConversationModule::General => {
            "Thanks for sharing that with me. I'm listening; tell me more whenever you're \
             ready."
        }
    }
}

/// Character-driven override responses for general-module messages.
pub const DIRECT_RESPONSE: &str =
    "Got it. Short version: pick one small thing, do it now, and check back in with me after.";

pub const POSITIVE_RESPONSE: &str =
    "Love the energy! Days like this are great for tackling the task you've been putting \
     off. What would feel best to get done?";

pub const EMOTIONAL_RESPONSE: &str =
    "It sounds like there's a lot of feeling behind that. Take your time; I'm here to \
     listen, and we can sort through it together.";

/// Catch-all used when composing fails for any reason. Always non-empty.
pub const FALLBACK_RESPONSE: &str =
    "I'm here to help with your studies and your balance. You can ask me about study \
     techniques, time management, stress relief, or anything in between.";

/// Returns the question-path bank for a module.
pub fn bank_for(module: ConversationModule) -> &'static [&'static str] {
    match module {
        ConversationModule::StudySupport => STUDY_RESPONSES,
        ConversationModule::EmotionalSupport => EMOTIONAL_RESPONSES,
        ConversationModule::Motivation => MOTIVATION_RESPONSES,
        ConversationModule::Wellbeing => WELLBEING_RESPONSES,
        ConversationModule::TimeManagement => TIME_RESPONSES,
        ConversationModule::General => GENERAL_RESPONSES,
    }
}

/// Deterministic variant selection: character count of the raw message
/// modulo the bank size. Not a hash; response parity with existing chat
/// history depends on this exact law.
pub fn pick(bank: &'static [&'static str], message: &str) -> &'static str {
    debug_assert!(!bank.is_empty());
    bank[message.chars().count() % bank.len()]
}
