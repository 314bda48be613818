//! Crisis keyword classification.
//!
//! High-recall substring match over a fixed list, so "die" also fires
//! inside "diet".

use serde::Serialize;

pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "hurt myself",
    "self-harm",
    "cutting",
    "overdose",
    "pills",
    "die",
    "death",
    "hopeless",
    "worthless",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub is_crisis: bool,
    /// Keywords found, in list order
    pub matched: Vec<&'static str>,
}

/// Classify a message. Never fails.
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    let matched: Vec<&'static str> = CRISIS_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lowered.contains(kw))
        .collect();

    if !matched.is_empty() {
        tracing::warn!("Crisis keywords matched: {:?}", matched);
    }

    Classification {
        is_crisis: !matched.is_empty(),
        matched,
    }
}

pub fn is_crisis(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
