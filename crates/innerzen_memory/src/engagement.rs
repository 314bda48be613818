//! Gamification: XP, levels, streaks, achievements and the daily summary.
//!
//! Every submission appends to its log, awards a fixed XP reward, and
//! recomputes the streak over that same log. Levels are derived from XP by
//! [`UserProfile::award_xp`] and never move backwards.

use crate::log::{active_days, EventLog};
use chrono::{DateTime, Days, Utc};
use innerzen_core::{Calendar, JournalEntry, MoodEntry, TodayPolicy, Timestamped, UserProfile};
use serde::Serialize;

pub const MOOD_XP_REWARD: u32 = 10;
pub const JOURNAL_XP_REWARD: u32 = 15;
/// Streaks look back at most this many days, today included.
pub const STREAK_WINDOW_DAYS: u32 = 30;

/// Consecutive local days with at least one entry, counting back from `now`.
///
/// Empty days before the first counted day are skipped, so a run that ended
/// a few days ago still counts. The first empty day after a counted day ends
/// the walk. Under [`TodayPolicy::Breaking`] an empty today yields 0.
pub fn streak<T: Timestamped>(
    log: &[T],
    now: DateTime<Utc>,
    calendar: &Calendar,
    policy: TodayPolicy,
) -> u32 {
    let active = active_days(log, calendar);
    let today = calendar.date_of(now);

    if policy == TodayPolicy::Breaking && !active.contains(&today) {
        return 0;
    }

    let mut count = 0;
    for back in 0..STREAK_WINDOW_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(back as u64)) else {
            break;
        };
        if active.contains(&day) {
            count += 1;
        } else if count > 0 {
            break;
        }
    }
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelUpSource {
    Mood,
    Journal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub level: u32,
    pub source: LevelUpSource,
}

impl LevelUp {
    pub fn message(&self) -> String {
        match self.source {
            LevelUpSource::Mood => {
                format!("You've reached level {}! Keep up the great work.", self.level)
            }
            LevelUpSource::Journal => format!(
                "You've reached level {}! Your self-reflection is paying off.",
                self.level
            ),
        }
    }
}

/// What a single submission changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub xp_awarded: u32,
    pub streak: u32,
    pub level_up: Option<LevelUp>,
}

/// Apply a mood submission to the profile and the mood log.
pub fn record_mood(
    profile: &mut UserProfile,
    log: &mut EventLog<MoodEntry>,
    entry: MoodEntry,
    calendar: &Calendar,
    policy: TodayPolicy,
) -> Progress {
    let now = entry.timestamp;
    profile.current_mood = Some(entry.mood);
    log.append(entry);

    let level_up = profile.award_xp(MOOD_XP_REWARD).map(|level| LevelUp {
        level,
        source: LevelUpSource::Mood,
    });
    profile.streak = streak(log.entries(), now, calendar, policy);

    tracing::debug!(
        "Mood recorded: xp={} level={} streak={}",
        profile.xp(),
        profile.level(),
        profile.streak
    );
    Progress {
        xp_awarded: MOOD_XP_REWARD,
        streak: profile.streak,
        level_up,
    }
}

/// Apply a journal submission to the profile and the journal log.
///
/// The streak is recomputed over the journal log, replacing the mood streak.
pub fn record_journal(
    profile: &mut UserProfile,
    log: &mut EventLog<JournalEntry>,
    entry: JournalEntry,
    calendar: &Calendar,
    policy: TodayPolicy,
) -> Progress {
    let now = entry.timestamp;
    log.append(entry);

    let level_up = profile.award_xp(JOURNAL_XP_REWARD).map(|level| LevelUp {
        level,
        source: LevelUpSource::Journal,
    });
    profile.streak = streak(log.entries(), now, calendar, policy);

    tracing::debug!(
        "Journal recorded: xp={} level={} streak={}",
        profile.xp(),
        profile.level(),
        profile.streak
    );
    Progress {
        xp_awarded: JOURNAL_XP_REWARD,
        streak: profile.streak,
        level_up,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstSteps,
    MoodMaster,
    ThoughtfulWriter,
    ConsistentTracker,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::FirstSteps,
        Achievement::MoodMaster,
        Achievement::ThoughtfulWriter,
        Achievement::ConsistentTracker,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstSteps => "First Steps",
            Achievement::MoodMaster => "Mood Master",
            Achievement::ThoughtfulWriter => "Thoughtful Writer",
            Achievement::ConsistentTracker => "Consistent Tracker",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstSteps => "Started your journey",
            Achievement::MoodMaster => "7 mood entries",
            Achievement::ThoughtfulWriter => "3 journal entries",
            Achievement::ConsistentTracker => "5-day streak",
        }
    }

    pub fn is_unlocked(&self, profile: &UserProfile, moods: usize, journals: usize) -> bool {
        match self {
            Achievement::FirstSteps => profile.xp() > 0,
            Achievement::MoodMaster => moods >= 7,
            Achievement::ThoughtfulWriter => journals >= 3,
            Achievement::ConsistentTracker => profile.streak >= 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked: bool,
}

pub fn achievements(profile: &UserProfile, moods: usize, journals: usize) -> Vec<AchievementStatus> {
    Achievement::ALL
        .into_iter()
        .map(|achievement| AchievementStatus {
            achievement,
            unlocked: achievement.is_unlocked(profile, moods, journals),
        })
        .collect()
}

/// Today's activity on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub mood_count: usize,
    /// 0 when nothing was logged today
    pub average_intensity: f64,
    pub journal_count: usize,
}

pub fn today_summary(
    moods: &EventLog<MoodEntry>,
    journals: &EventLog<JournalEntry>,
    calendar: &Calendar,
    now: DateTime<Utc>,
) -> TodaySummary {
    let (count, sum) = moods
        .today(calendar, now)
        .fold((0usize, 0.0f64), |(n, s), e| (n + 1, s + e.intensity.as_f64()));

    TodaySummary {
        mood_count: count,
        average_intensity: if count > 0 { sum / count as f64 } else { 0.0 },
        journal_count: journals.today(calendar, now).count(),
    }
}
