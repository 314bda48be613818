use crate::insights::{generate_insights, Insight};
use crate::patterns::{detect_patterns, Pattern};
use crate::stats::{mood_stats, MoodStats};
use crate::window::filter_by_timeframe;
use chrono::{DateTime, Utc};
use innerzen_core::{Calendar, JournalEntry, MoodEntry, Timeframe};
use serde::Serialize;

/// Everything the analytics view shows for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub timeframe: Timeframe,
    pub generated_at: DateTime<Utc>,
    pub mood_count: usize,
    pub journal_count: usize,
    pub stats: MoodStats,
    pub patterns: Vec<Pattern>,
    pub insights: Vec<Insight>,
}

/// Filter both logs to `timeframe` and run the full analysis over the window.
pub fn analyze(
    moods: &[MoodEntry],
    journals: &[JournalEntry],
    timeframe: Timeframe,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> AnalysisReport {
    let moods = filter_by_timeframe(moods, timeframe, now);
    let journals = filter_by_timeframe(journals, timeframe, now);

    let stats = mood_stats(&moods);
    let patterns = detect_patterns(&moods, &journals, &stats, calendar);
    let insights = generate_insights(&stats, &moods, &journals, timeframe);

    tracing::info!(
        "Analysis over {:?}: {} moods, {} journals, {} patterns, {} insights",
        timeframe,
        moods.len(),
        journals.len(),
        patterns.len(),
        insights.len()
    );

    AnalysisReport {
        timeframe,
        generated_at: now,
        mood_count: moods.len(),
        journal_count: journals.len(),
        stats,
        patterns,
        insights,
    }
}
