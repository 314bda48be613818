//! Natural-language insights derived from statistics and activity counts.

use crate::stats::MoodStats;
use crate::thresholds::*;
use innerzen_core::{JournalEntry, MoodEntry, Timeframe};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Improvement,
    Concern,
    Achievement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub category: &'static str,
    pub message: &'static str,
    pub kind: InsightKind,
}

impl Insight {
    const fn new(category: &'static str, message: &'static str, kind: InsightKind) -> Self {
        Self {
            category,
            message,
            kind,
        }
    }
}

pub const TRENDING_UP: Insight = Insight::new(
    "Progress",
    "Your mood has been trending upward recently - great progress!",
    InsightKind::Achievement,
);
pub const TRENDING_DOWN: Insight = Insight::new(
    "Attention Needed",
    "Your mood has been declining lately. Consider reaching out for support.",
    InsightKind::Concern,
);
pub const LOG_MORE_OFTEN: Insight = Insight::new(
    "Tracking",
    "Try to log your mood more frequently for better insights.",
    InsightKind::Improvement,
);
pub const TRY_JOURNALING: Insight = Insight::new(
    "Self-Reflection",
    "Regular journaling can help improve self-awareness and mood.",
    InsightKind::Improvement,
);
pub const JOURNALING_HABIT: Insight = Insight::new(
    "Self-Care",
    "Excellent job maintaining a regular journaling practice!",
    InsightKind::Achievement,
);
pub const POSITIVE_RANGE: Insight = Insight::new(
    "Wellbeing",
    "You're maintaining a positive mood range - keep it up!",
    InsightKind::Achievement,
);
pub const LOW_RANGE: Insight = Insight::new(
    "Support",
    "Your average mood is quite low. Consider professional support.",
    InsightKind::Concern,
);

/// Ordered insights: trend, tracking frequency, journaling, mood range.
pub fn generate_insights(
    stats: &MoodStats,
    moods: &[MoodEntry],
    journals: &[JournalEntry],
    timeframe: Timeframe,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let monthly = timeframe == Timeframe::Month;

    if stats.trend > TREND_UP_THRESHOLD {
        insights.push(TRENDING_UP);
    } else if stats.trend < TREND_DOWN_THRESHOLD {
        insights.push(TRENDING_DOWN);
    }

    if monthly && moods.len() < MONTHLY_MIN_MOODS {
        insights.push(LOG_MORE_OFTEN);
    }

    if monthly && journals.len() < MONTHLY_MIN_JOURNALS {
        insights.push(TRY_JOURNALING);
    } else if journals.len() > JOURNAL_HABIT_COUNT {
        insights.push(JOURNALING_HABIT);
    }

    // an empty window averages 0 and reads as low
    if stats.average > POSITIVE_AVERAGE {
        insights.push(POSITIVE_RANGE);
    } else if stats.average < LOW_AVERAGE {
        insights.push(LOW_RANGE);
    }

    insights
}
