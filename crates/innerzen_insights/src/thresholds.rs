//! Fixed tuning constants for statistics, patterns and insights.

/// Number of most recent entries compared against the block before them for the trend.
pub const TREND_WINDOW: usize = 7;

/// Each partition needs strictly more entries than this.
pub const WEEKEND_MIN_ENTRIES: usize = 2;
/// Mean difference (weekend minus weekday) must exceed this in magnitude.
pub const WEEKEND_MIN_DIFFERENCE: f64 = 1.0;
pub const WEEKEND_CONFIDENCE_PER_POINT: f64 = 20.0;
pub const WEEKEND_MAX_CONFIDENCE: f64 = 85.0;

pub const STABLE_MAX_VARIANCE: f64 = 2.0;
/// A stability claim needs strictly more entries than this.
pub const STABLE_MIN_ENTRIES: usize = 7;
pub const STABLE_CONFIDENCE: f64 = 75.0;

pub const VOLATILE_MIN_VARIANCE: f64 = 4.0;
pub const VOLATILE_CONFIDENCE: f64 = 70.0;

/// Strictly more journal entries than this are needed to look for a correlation.
pub const JOURNAL_CORRELATION_MIN_JOURNALS: usize = 5;
/// Strictly more moods on journaling days than this are needed.
pub const JOURNAL_CORRELATION_MIN_MOODS: usize = 3;
/// Journal-day mean must beat the overall mean by more than this.
pub const JOURNAL_CORRELATION_MARGIN: f64 = 0.5;
pub const JOURNAL_CORRELATION_CONFIDENCE: f64 = 65.0;

pub const TREND_UP_THRESHOLD: f64 = 1.0;
pub const TREND_DOWN_THRESHOLD: f64 = -1.0;

/// Monthly mood logs below this count earn a "log more often" nudge.
pub const MONTHLY_MIN_MOODS: usize = 7;
/// Monthly journal counts below this earn a "try journaling" nudge.
pub const MONTHLY_MIN_JOURNALS: usize = 3;
/// Journal counts above this earn a habit achievement.
pub const JOURNAL_HABIT_COUNT: usize = 10;

pub const POSITIVE_AVERAGE: f64 = 7.0;
pub const LOW_AVERAGE: f64 = 4.0;
