//! Aggregate statistics over a window of mood entries.

use crate::thresholds::TREND_WINDOW;
use innerzen_core::{MoodEntry, MoodTag};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStats {
    /// Mean intensity
    pub average: f64,
    /// Mean of the last 7 entries minus mean of the 7 before them
    pub trend: f64,
    /// Population variance of intensity (divisor N)
    pub variance: f64,
    /// `None` when the window is empty
    pub most_common: Option<MoodTag>,
}

impl MoodStats {
    pub fn empty() -> Self {
        Self {
            average: 0.0,
            trend: 0.0,
            variance: 0.0,
            most_common: None,
        }
    }

    /// Display label for the most common mood, `"none"` for an empty window.
    pub fn most_common_label(&self) -> &'static str {
        self.most_common.map(|m| m.as_str()).unwrap_or("none")
    }
}

fn mean_intensity(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: f64 = entries.iter().map(|e| e.intensity.as_f64()).sum();
    Some(sum / entries.len() as f64)
}

/// Statistics for `moods`, which must be in chronological order.
pub fn mood_stats(moods: &[MoodEntry]) -> MoodStats {
    let Some(average) = mean_intensity(moods) else {
        return MoodStats::empty();
    };

    let n = moods.len();
    let recent = &moods[n.saturating_sub(TREND_WINDOW)..];
    let previous = &moods[n.saturating_sub(TREND_WINDOW * 2)..n.saturating_sub(TREND_WINDOW)];
    let recent_avg = mean_intensity(recent).unwrap_or(average);
    let previous_avg = mean_intensity(previous).unwrap_or(average);
    let trend = recent_avg - previous_avg;

    let variance = moods
        .iter()
        .map(|e| (e.intensity.as_f64() - average).powi(2))
        .sum::<f64>()
        / n as f64;

    MoodStats {
        average,
        trend,
        variance,
        most_common: most_common_mood(moods),
    }
}

/// Tag with the highest count. On a tie, the tag seen first wins.
pub fn most_common_mood(moods: &[MoodEntry]) -> Option<MoodTag> {
    // first-seen order is kept so the tie-break is deterministic
    let mut counts: Vec<(MoodTag, usize)> = Vec::new();
    for entry in moods {
        match counts.iter_mut().find(|(tag, _)| *tag == entry.mood) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.mood, 1)),
        }
    }

    let mut best: Option<(MoodTag, usize)> = None;
    for (tag, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((tag, count));
        }
    }
    best.map(|(tag, _)| tag)
}
