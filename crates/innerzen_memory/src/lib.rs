pub mod engagement;
pub mod engine;
pub mod log;
pub mod store;

pub use engagement::{
    achievements, record_journal, record_mood, streak, today_summary, Achievement,
    AchievementStatus, LevelUp, LevelUpSource, Progress, TodaySummary, JOURNAL_XP_REWARD,
    MOOD_XP_REWARD, STREAK_WINDOW_DAYS,
};
pub use engine::{
    EngineError, EngineEvent, JournalReceipt, MoodReceipt, PendingJournal, WellbeingEngine,
};
pub use log::EventLog;
pub use store::{InMemoryStore, KeyValueStore, SqliteStore};
