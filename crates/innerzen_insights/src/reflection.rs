//! Offline journal analysis.
//!
//! A small lexicon stands in for a language model: words in the entry are
//! matched against emotion cues, the dominant cue picks the mood, and a
//! canned insight is chosen for that mood.

use innerzen_core::MoodTag;
use serde::Serialize;

/// Emotions reported when nothing in the text matches the lexicon.
pub const DEFAULT_EMOTIONS: [&str; 3] = ["hopeful", "reflective", "grateful"];

pub const DEFAULT_INSIGHT: &str = "Your writing shows a beautiful balance of self-reflection and \
gratitude. The themes of growth and acceptance are strong indicators of emotional resilience.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reflection {
    pub mood: MoodTag,
    pub emotions: Vec<String>,
    pub insight: String,
}

struct Cue {
    emotion: &'static str,
    mood: MoodTag,
    words: &'static [&'static str],
}

// Order matters: on equal hit counts the earlier mood wins.
const LEXICON: &[Cue] = &[
    Cue {
        emotion: "grateful",
        mood: MoodTag::Peaceful,
        words: &["grateful", "thankful", "gratitude", "appreciate"],
    },
    Cue {
        emotion: "hopeful",
        mood: MoodTag::Motivated,
        words: &["hope", "hopeful", "optimistic", "forward"],
    },
    Cue {
        emotion: "joyful",
        mood: MoodTag::Happy,
        words: &["happy", "joy", "excited", "fun", "laughed"],
    },
    Cue {
        emotion: "determined",
        mood: MoodTag::Motivated,
        words: &["goal", "goals", "determined", "progress", "achieved"],
    },
    Cue {
        emotion: "relaxed",
        mood: MoodTag::Calm,
        words: &["calm", "relaxed", "rested", "quiet", "peaceful"],
    },
    Cue {
        emotion: "worried",
        mood: MoodTag::Anxious,
        words: &["worried", "anxious", "nervous", "afraid", "panic"],
    },
    Cue {
        emotion: "overwhelmed",
        mood: MoodTag::Stressed,
        words: &["stress", "stressed", "overwhelmed", "deadline", "pressure"],
    },
    Cue {
        emotion: "lonely",
        mood: MoodTag::Sad,
        words: &["sad", "lonely", "cried", "crying", "miss", "down"],
    },
];

fn insight_for(mood: MoodTag) -> &'static str {
    match mood {
        MoodTag::Happy => {
            "There is real lightness in what you wrote. Noticing the good moments helps them last."
        }
        MoodTag::Motivated => {
            "Your entry is full of forward momentum. Small steps toward your goals are adding up."
        }
        MoodTag::Anxious => {
            "Worry comes through in your writing. Naming it on the page is already a way of \
             loosening its grip."
        }
        MoodTag::Stressed => {
            "You are carrying a lot right now. Consider which pressures you can set down, even \
             briefly."
        }
        MoodTag::Sad => {
            "Your writing carries some heaviness. Be gentle with yourself, and reach out to \
             someone you trust if it lingers."
        }
        MoodTag::Calm | MoodTag::Peaceful | MoodTag::Neutral => DEFAULT_INSIGHT,
    }
}

/// Analyze a journal entry. Never fails; text with no cues reads as calm.
pub fn reflect(text: &str) -> Reflection {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|t| !t.is_empty())
        .collect();

    // (mood, hits) in lexicon order
    let mut tallies: Vec<(MoodTag, usize)> = Vec::new();
    let mut emotions = Vec::new();

    for cue in LEXICON {
        let hits = tokens.iter().filter(|t| cue.words.contains(t)).count();
        if hits == 0 {
            continue;
        }
        emotions.push(cue.emotion.to_string());
        match tallies.iter_mut().find(|(m, _)| *m == cue.mood) {
            Some((_, n)) => *n += hits,
            None => tallies.push((cue.mood, hits)),
        }
    }

    let mut best: Option<(MoodTag, usize)> = None;
    for (mood, hits) in tallies {
        if best.map_or(true, |(_, top)| hits > top) {
            best = Some((mood, hits));
        }
    }

    let mood = best.map(|(m, _)| m).unwrap_or(MoodTag::Calm);
    if emotions.is_empty() {
        emotions = DEFAULT_EMOTIONS.iter().map(|e| e.to_string()).collect();
    }

    tracing::debug!("Reflected journal entry as {} ({} emotions)", mood, emotions.len());
    Reflection {
        mood,
        emotions,
        insight: insight_for(mood).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_falls_back_to_defaults() {
        let r = reflect("Went to the shop and cooked dinner.");
        assert_eq!(r.mood, MoodTag::Calm);
        assert_eq!(r.emotions, vec!["hopeful", "reflective", "grateful"]);
        assert_eq!(r.insight, DEFAULT_INSIGHT);
    }

    #[test]
    fn test_dominant_cue_sets_mood() {
        let r = reflect("So stressed. The deadline pressure is overwhelming, but I'm thankful for my team.");
        assert_eq!(r.mood, MoodTag::Stressed);
        assert_eq!(r.emotions, vec!["grateful", "overwhelmed"]);
    }

    #[test]
    fn test_tie_goes_to_earlier_cue() {
        let r = reflect("Worried about tomorrow but grateful for today.");
        assert_eq!(r.mood, MoodTag::Peaceful);
    }

    #[test]
    fn test_matching_is_whole_word_and_case_insensitive() {
        // "Downtown" must not count as "down"
        let r = reflect("Walked DOWNTOWN, felt HAPPY.");
        assert_eq!(r.mood, MoodTag::Happy);
        assert_eq!(r.emotions, vec!["joyful"]);
    }

    #[test]
    fn test_cues_sharing_a_mood_accumulate() {
        let r = reflect("Hopeful about my goals, I'm sad though. Progress feels real.");
        assert_eq!(r.mood, MoodTag::Motivated);
        assert_eq!(r.emotions, vec!["hopeful", "determined", "lonely"]);
    }
}
