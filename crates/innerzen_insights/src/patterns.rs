//! Behavioral pattern heuristics.
//!
//! Each heuristic is evaluated independently; every one that fires is
//! reported, in a fixed order (weekend, stability/volatility, journaling).

use crate::stats::MoodStats;
use crate::thresholds::*;
use innerzen_core::{Calendar, JournalEntry, MoodEntry};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Weekend,
    Stability,
    Volatility,
    JournalingCorrelation,
}

impl PatternKind {
    pub fn title(&self) -> &'static str {
        match self {
            PatternKind::Weekend => "Weekend Pattern",
            PatternKind::Stability => "Stability Pattern",
            PatternKind::Volatility => "Volatility Pattern",
            PatternKind::JournalingCorrelation => "Journaling Correlation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub description: String,
    /// 0 to 100
    pub confidence: f64,
    pub impact: Impact,
}

fn mean(entries: &[&MoodEntry]) -> f64 {
    entries.iter().map(|e| e.intensity.as_f64()).sum::<f64>() / entries.len() as f64
}

/// Run every heuristic over one window of activity.
pub fn detect_patterns(
    moods: &[MoodEntry],
    journals: &[JournalEntry],
    stats: &MoodStats,
    calendar: &Calendar,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();

    if let Some(p) = weekend_pattern(moods, calendar) {
        patterns.push(p);
    }
    if let Some(p) = stability_pattern(moods, stats) {
        patterns.push(p);
    }
    if let Some(p) = journaling_pattern(moods, journals, stats, calendar) {
        patterns.push(p);
    }

    tracing::debug!("Detected {} patterns over {} moods", patterns.len(), moods.len());
    patterns
}

fn weekend_pattern(moods: &[MoodEntry], calendar: &Calendar) -> Option<Pattern> {
    let (weekend, weekday): (Vec<&MoodEntry>, Vec<&MoodEntry>) =
        moods.iter().partition(|m| calendar.is_weekend(m.timestamp));

    if weekend.len() <= WEEKEND_MIN_ENTRIES || weekday.len() <= WEEKEND_MIN_ENTRIES {
        return None;
    }

    let difference = mean(&weekend) - mean(&weekday);
    if difference.abs() <= WEEKEND_MIN_DIFFERENCE {
        return None;
    }

    let better_on_weekends = difference > 0.0;
    Some(Pattern {
        kind: PatternKind::Weekend,
        description: if better_on_weekends {
            "You tend to feel better on weekends".to_string()
        } else {
            "You tend to feel better on weekdays".to_string()
        },
        confidence: (difference.abs() * WEEKEND_CONFIDENCE_PER_POINT).min(WEEKEND_MAX_CONFIDENCE),
        impact: if better_on_weekends {
            Impact::Positive
        } else {
            Impact::Negative
        },
    })
}

fn stability_pattern(moods: &[MoodEntry], stats: &MoodStats) -> Option<Pattern> {
    if stats.variance < STABLE_MAX_VARIANCE && moods.len() > STABLE_MIN_ENTRIES {
        Some(Pattern {
            kind: PatternKind::Stability,
            description: "Your mood has been relatively stable".to_string(),
            confidence: STABLE_CONFIDENCE,
            impact: Impact::Positive,
        })
    } else if stats.variance > VOLATILE_MIN_VARIANCE {
        Some(Pattern {
            kind: PatternKind::Volatility,
            description: "Your mood shows significant variations".to_string(),
            confidence: VOLATILE_CONFIDENCE,
            impact: Impact::Neutral,
        })
    } else {
        None
    }
}

fn journaling_pattern(
    moods: &[MoodEntry],
    journals: &[JournalEntry],
    stats: &MoodStats,
    calendar: &Calendar,
) -> Option<Pattern> {
    if journals.len() <= JOURNAL_CORRELATION_MIN_JOURNALS {
        return None;
    }

    let journal_days: HashSet<_> = journals
        .iter()
        .map(|j| calendar.date_of(j.timestamp))
        .collect();
    let on_journal_days: Vec<&MoodEntry> = moods
        .iter()
        .filter(|m| journal_days.contains(&calendar.date_of(m.timestamp)))
        .collect();

    if on_journal_days.len() <= JOURNAL_CORRELATION_MIN_MOODS {
        return None;
    }

    if mean(&on_journal_days) > stats.average + JOURNAL_CORRELATION_MARGIN {
        Some(Pattern {
            kind: PatternKind::JournalingCorrelation,
            description: "You tend to feel better on days you journal".to_string(),
            confidence: JOURNAL_CORRELATION_CONFIDENCE,
            impact: Impact::Positive,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::mood_stats;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use innerzen_core::{Intensity, MoodTag};

    // 2024-03-04 is a Monday
    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap()
    }

    fn mood(day_offset: i64, intensity: i64) -> MoodEntry {
        MoodEntry::new(
            MoodTag::Neutral,
            Intensity::new(intensity).unwrap(),
            monday() + Duration::days(day_offset),
        )
    }

    fn journal_at(ts: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id: Default::default(),
            content: "Spent the evening writing".to_string(),
            mood: MoodTag::Calm,
            timestamp: ts,
            emotions: vec![],
            ai_insight: None,
        }
    }

    fn detect(moods: &[MoodEntry], journals: &[JournalEntry]) -> Vec<Pattern> {
        let stats = mood_stats(moods);
        detect_patterns(moods, journals, &stats, &Calendar::utc())
    }

    #[test]
    fn test_weekend_pattern_positive() {
        // Sat/Sun at 8, Mon-Wed at 5, over two weekends
        let moods = vec![
            mood(0, 5),
            mood(1, 5),
            mood(2, 5),
            mood(5, 8),
            mood(6, 8),
            mood(12, 8),
        ];
        let patterns = detect(&moods, &[]);
        let weekend = patterns
            .iter()
            .find(|p| p.kind == PatternKind::Weekend)
            .expect("weekend pattern");
        assert_eq!(weekend.impact, Impact::Positive);
        assert!((weekend.confidence - 60.0).abs() < 1e-9);
        assert_eq!(weekend.description, "You tend to feel better on weekends");
    }

    #[test]
    fn test_weekend_confidence_is_clamped() {
        let moods = vec![
            mood(0, 9),
            mood(1, 9),
            mood(2, 9),
            mood(5, 2),
            mood(6, 2),
            mood(12, 2),
        ];
        let patterns = detect(&moods, &[]);
        let weekend = patterns.iter().find(|p| p.kind == PatternKind::Weekend).unwrap();
        assert_eq!(weekend.impact, Impact::Negative);
        assert_eq!(weekend.confidence, WEEKEND_MAX_CONFIDENCE);
    }

    #[test]
    fn test_weekend_needs_three_per_partition() {
        let moods = vec![mood(0, 5), mood(1, 5), mood(2, 5), mood(5, 9), mood(6, 9)];
        assert!(detect(&moods, &[])
            .iter()
            .all(|p| p.kind != PatternKind::Weekend));
    }

    #[test]
    fn test_weekend_small_difference_ignored() {
        let moods = vec![
            mood(0, 5),
            mood(1, 5),
            mood(2, 5),
            mood(5, 6),
            mood(6, 6),
            mood(12, 6),
        ];
        assert!(detect(&moods, &[])
            .iter()
            .all(|p| p.kind != PatternKind::Weekend));
    }

    #[test]
    fn test_stability_requires_more_than_seven() {
        let seven: Vec<_> = (0..7).map(|d| mood(d * 7, 6)).collect();
        assert!(detect(&seven, &[]).is_empty());

        let eight: Vec<_> = (0..8).map(|d| mood(d * 7, 6)).collect();
        let patterns = detect(&eight, &[]);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternKind::Stability);
        assert_eq!(patterns[0].confidence, STABLE_CONFIDENCE);
    }

    #[test]
    fn test_volatility() {
        let moods = vec![mood(0, 1), mood(7, 10), mood(14, 1), mood(21, 10)];
        let patterns = detect(&moods, &[]);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternKind::Volatility);
        assert_eq!(patterns[0].impact, Impact::Neutral);
    }

    #[test]
    fn test_journaling_correlation() {
        // Six journals on Mon..Sat of week one; moods that week at 9,
        // moods in weeks two and three (no journaling) at 3.
        let journals: Vec<_> = (0..6)
            .map(|d| journal_at(monday() + Duration::days(d) + Duration::hours(8)))
            .collect();
        let mut moods: Vec<_> = (0..4).map(|d| mood(d, 9)).collect();
        moods.extend((7..11).map(|d| mood(d, 3)));

        let patterns = detect(&moods, &journals);
        let correlation = patterns
            .iter()
            .find(|p| p.kind == PatternKind::JournalingCorrelation)
            .expect("journaling correlation");
        assert_eq!(correlation.impact, Impact::Positive);
        assert_eq!(correlation.confidence, JOURNAL_CORRELATION_CONFIDENCE);
    }

    #[test]
    fn test_journaling_correlation_needs_six_journals() {
        let journals: Vec<_> = (0..5).map(|d| journal_at(monday() + Duration::days(d))).collect();
        let mut moods: Vec<_> = (0..4).map(|d| mood(d, 9)).collect();
        moods.extend((7..11).map(|d| mood(d, 3)));
        assert!(detect(&moods, &journals)
            .iter()
            .all(|p| p.kind != PatternKind::JournalingCorrelation));
    }

    #[test]
    fn test_empty_window_has_no_patterns() {
        assert!(detect(&[], &[]).is_empty());
    }
}
