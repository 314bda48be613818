//! Reply selection: crisis tier first, then topic router, then general pool.

use crate::chooser::{choose, Chooser};
use crate::classifier::{classify, Classification};
use innerzen_core::ResponseStyle;
use serde::Serialize;

pub const CRISIS_OPENERS: [&str; 3] = [
    "I'm very concerned about what you're sharing. Your life has value and meaning. Please reach out for immediate help:",
    "I hear that you're in tremendous pain right now. You don't have to go through this alone. Please contact:",
    "What you're feeling is valid, but I want you to be safe. There are people who want to help you right now:",
];

pub const CRISIS_RESOURCES: &str = "\n\n🆘 **Immediate Help Available:**
• **Call 988** - Suicide & Crisis Lifeline (24/7)
• **Text HOME to 741741** - Crisis Text Line
• **Call 911** - For immediate emergency
• **Go to your nearest emergency room**

You are not alone. These feelings can change. Help is available right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Anxiety,
    Depression,
    Sleep,
    Stress,
}

impl Topic {
    /// Router order: the first topic with a matching keyword wins.
    pub const ROUTE_ORDER: [Topic; 4] = [Topic::Anxiety, Topic::Depression, Topic::Sleep, Topic::Stress];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Anxiety => &["anxious", "anxiety", "worried"],
            Topic::Depression => &["depressed", "depression", "sad", "down"],
            Topic::Sleep => &["sleep", "insomnia", "tired"],
            Topic::Stress => &["stress", "overwhelmed", "pressure"],
        }
    }

    /// Route a message, case-insensitively.
    pub fn route(text: &str) -> Option<Topic> {
        let lowered = text.to_lowercase();
        Self::ROUTE_ORDER
            .into_iter()
            .find(|topic| topic.keywords().iter().any(|kw| lowered.contains(kw)))
    }

    pub fn template(self, style: ResponseStyle) -> &'static str {
        use ResponseStyle::*;
        match (self, style) {
            (Topic::Anxiety, Gentle) => "I can sense the anxiety you're feeling, and I want you to know it's completely valid. Try taking three deep breaths with me: breathe in for 4 counts, hold for 4, exhale for 6. 🌸 Would you like to try a grounding exercise?",
            (Topic::Anxiety, Motivational) => "Anxiety is tough, but you're tougher! 💪 Let's tackle this together. Try the 5-4-3-2-1 technique: name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, and 1 you can taste. You've got this!",
            (Topic::Anxiety, Neutral) => "Anxiety can feel overwhelming, but there are effective techniques to help manage it. Would you like to try a breathing exercise or learn about grounding techniques?",

            (Topic::Depression, Gentle) => "I hear you, and I'm so sorry you're feeling this way. Depression can make everything feel heavy and difficult. Please remember that what you're feeling is valid, and there is hope for brighter days. 💙 Small steps count - even just reaching out here shows strength.",
            (Topic::Depression, Motivational) => "I know depression feels like a heavy weight, but you're showing incredible strength by talking about it! 🌟 Every small step forward is a victory. What's one tiny thing that brought you even a moment of peace recently?",
            (Topic::Depression, Neutral) => "Depression can be very challenging, and I'm glad you're reaching out. Remember that seeking help is a sign of strength, not weakness. Are you currently receiving professional support?",

            (Topic::Sleep, Gentle) => "Restless nights can leave everything feeling heavier, and you deserve real rest. 🌙 A soft, predictable bedtime routine, dim lights and a screen-free hour can help your body unwind. Would you like to try a slow breathing exercise before bed?",
            (Topic::Sleep, Motivational) => "Great sleep is a skill, and you can train it! 🚀 Lock in a consistent sleep schedule, park the screens before bedtime, and build a wind-down routine you stick to. Which one will you start tonight?",
            (Topic::Sleep, Neutral) => "Sleep issues can significantly impact mental health. Some helpful strategies include maintaining a consistent sleep schedule, avoiding screens before bedtime, and creating a calming bedtime routine. Have you tried any relaxation techniques before sleep?",

            (Topic::Stress, Gentle) => "Feeling overwhelmed is so human, and you're not alone in this feeling. 🌿 When stress builds up, our minds need gentle care. Try placing your hand on your heart and taking slow, deep breaths. What's feeling most overwhelming right now?",
            (Topic::Stress, Motivational) => "Stress is your mind's way of saying 'Hey, we need to tackle this!' 🎯 You've handled 100% of your tough days so far - that's a perfect track record! Let's break down what's overwhelming you into manageable pieces.",
            (Topic::Stress, Neutral) => "Stress can feel overwhelming, but breaking things down into smaller, manageable steps can help. What's the main source of your stress right now?",
        }
    }
}

const NEUTRAL_POOL: [&str; 4] = [
    "Thank you for sharing that with me. Your feelings are valid and important. What would be most helpful for you right now?",
    "I appreciate you opening up. It takes courage to talk about our mental health. How has your day been treating you?",
    "I'm here to listen and support you. What's been on your mind lately that you'd like to talk about?",
    "That sounds like it's been weighing on you. Sometimes just talking about things can help us process them better. Tell me more about how you're feeling.",
];

const GENTLE_POOL: [&str; 3] = [
    "Thank you for trusting me with your feelings, dear soul. 💫 You're being so brave by reaching out. What gentle support do you need most right now?",
    "I can feel the courage it took to share that with me. 🌸 Your feelings matter deeply. How can I best support you in this moment?",
    "You're in a safe space here, beautiful human. 💙 Whatever you're feeling is completely valid. What would bring you the most peace right now?",
];

const MOTIVATIONAL_POOL: [&str; 3] = [
    "I love that you're taking charge of your mental health - that's champion behavior! 🚀 What's your next move gonna be?",
    "You're showing incredible self-awareness by talking about this! 💪 That's already a huge step forward. What victory, even a small one, can we celebrate today?",
    "Look at you being proactive about your wellbeing! 🌟 You're already on the right path. What goal are we crushing next?",
];

/// General-support replies for a style.
pub fn general_pool(style: ResponseStyle) -> &'static [&'static str] {
    match style {
        ResponseStyle::Gentle => &GENTLE_POOL,
        ResponseStyle::Motivational => &MOTIVATIONAL_POOL,
        ResponseStyle::Neutral => &NEUTRAL_POOL,
    }
}

/// Which branch produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "tier", content = "topic")]
pub enum ReplyTier {
    Crisis,
    Topic(Topic),
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub tier: ReplyTier,
}

impl Reply {
    pub fn is_crisis(&self) -> bool {
        self.tier == ReplyTier::Crisis
    }
}

pub fn crisis_response(chooser: &dyn Chooser) -> String {
    let opener = choose(chooser, &CRISIS_OPENERS);
    format!("{opener}{CRISIS_RESOURCES}")
}

/// Build the companion's reply to one user message.
pub fn respond(text: &str, style: ResponseStyle, chooser: &dyn Chooser) -> Reply {
    reply_for(text, &classify(text), style, chooser)
}

pub(crate) fn reply_for(
    text: &str,
    classification: &Classification,
    style: ResponseStyle,
    chooser: &dyn Chooser,
) -> Reply {
    if classification.is_crisis {
        return Reply {
            text: crisis_response(chooser),
            tier: ReplyTier::Crisis,
        };
    }

    if let Some(topic) = Topic::route(text) {
        tracing::debug!("Routed message to {:?} ({:?} style)", topic, style);
        return Reply {
            text: topic.template(style).to_string(),
            tier: ReplyTier::Topic(topic),
        };
    }

    Reply {
        text: choose(chooser, general_pool(style)).to_string(),
        tier: ReplyTier::General,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::FixedChooser;

    #[test]
    fn test_crisis_takes_priority_over_topics() {
        let chooser = FixedChooser::new(1);
        let reply = respond("I'm so anxious I want to end my life", ResponseStyle::Gentle, &chooser);
        assert!(reply.is_crisis());
        assert!(reply.text.starts_with(CRISIS_OPENERS[1]));
        assert!(reply.text.contains("Call 988"));
        assert!(reply.text.contains("Text HOME to 741741"));
        assert!(reply.text.contains("Call 911"));
        assert!(reply.text.contains("nearest emergency room"));
    }

    #[test]
    fn test_empty_text_falls_back_to_general_pool() {
        let chooser = FixedChooser::new(0);
        for text in ["", "   "] {
            let reply = respond(text, ResponseStyle::Neutral, &chooser);
            assert_eq!(reply.tier, ReplyTier::General);
            assert_eq!(reply.text, general_pool(ResponseStyle::Neutral)[0]);
        }
    }

    #[test]
    fn test_topic_order_first_match_wins() {
        // mentions both stress and anxiety; anxiety is routed first
        assert_eq!(Topic::route("Work stress makes me anxious"), Some(Topic::Anxiety));
        assert_eq!(Topic::route("I'm TIRED and under pressure"), Some(Topic::Sleep));
        assert_eq!(Topic::route("nothing in particular"), None);
    }

    #[test]
    fn test_topic_reply_follows_style() {
        let chooser = FixedChooser::default();
        let reply = respond("I feel overwhelmed", ResponseStyle::Motivational, &chooser);
        assert_eq!(reply.tier, ReplyTier::Topic(Topic::Stress));
        assert_eq!(reply.text, Topic::Stress.template(ResponseStyle::Motivational));
    }

    #[test]
    fn test_every_topic_has_a_template_per_style() {
        for topic in Topic::ROUTE_ORDER {
            let texts: Vec<_> = [ResponseStyle::Gentle, ResponseStyle::Motivational, ResponseStyle::Neutral]
                .into_iter()
                .map(|s| topic.template(s))
                .collect();
            assert!(texts.iter().all(|t| !t.is_empty()));
            assert_ne!(texts[0], texts[1]);
            assert_ne!(texts[1], texts[2]);
        }
    }

    #[test]
    fn test_general_pool_by_style() {
        let chooser = FixedChooser::new(3);
        let reply = respond("Hello there", ResponseStyle::Neutral, &chooser);
        assert_eq!(reply.tier, ReplyTier::General);
        assert_eq!(reply.text, NEUTRAL_POOL[3]);

        // index wraps for the three-entry pools
        let reply = respond("Hello there", ResponseStyle::Gentle, &chooser);
        assert_eq!(reply.text, GENTLE_POOL[0]);
    }
}
