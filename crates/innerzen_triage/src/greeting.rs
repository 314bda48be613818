use innerzen_core::ResponseStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Morning before 12:00, afternoon before 17:00, evening otherwise.
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            TimeOfDay::Morning
        } else if hour < 17 {
            TimeOfDay::Afternoon
        } else {
            TimeOfDay::Evening
        }
    }
}

/// Dashboard greeting for a style at a local hour (0-23).
pub fn greeting(style: ResponseStyle, hour: u32) -> &'static str {
    use ResponseStyle::*;
    use TimeOfDay::*;
    match (style, TimeOfDay::from_hour(hour)) {
        (Gentle, Morning) => "Good morning, beautiful soul 🌸",
        (Gentle, Afternoon) => "Good afternoon, dear friend 💫",
        (Gentle, Evening) => "Good evening, peaceful spirit 🌙",
        (Motivational, Morning) => "Rise and shine, champion! 🚀",
        (Motivational, Afternoon) => "Keep crushing it today! ⚡",
        (Motivational, Evening) => "You've got this! Finish strong! 💪",
        (Neutral, Morning) => "Good morning",
        (Neutral, Afternoon) => "Good afternoon",
        (Neutral, Evening) => "Good evening",
    }
}

/// First message of every conversation.
pub fn welcome_message(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Gentle => "Hello, beautiful soul 💙 I'm here to listen and support you on your mental health journey. How are you feeling today?",
        ResponseStyle::Motivational => "Hey there, champion! 💪 I'm your AI mental health companion, ready to help you tackle whatever's on your mind. What's going on today?",
        ResponseStyle::Neutral => "Hello! I'm your AI mental health companion. I'm here to provide support, resources, and a listening ear. How can I help you today?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn test_greeting_by_style() {
        assert_eq!(greeting(ResponseStyle::Neutral, 9), "Good morning");
        assert_eq!(greeting(ResponseStyle::Motivational, 20), "You've got this! Finish strong! 💪");
        assert!(greeting(ResponseStyle::Gentle, 13).starts_with("Good afternoon"));
    }

    #[test]
    fn test_welcome_differs_per_style() {
        assert!(welcome_message(ResponseStyle::Gentle).starts_with("Hello, beautiful soul"));
        assert!(welcome_message(ResponseStyle::Motivational).starts_with("Hey there, champion!"));
        assert!(welcome_message(ResponseStyle::Neutral).starts_with("Hello! I'm your AI"));
    }
}
