//! # InnerZen Core
//!
//! Shared vocabulary for the wellbeing engine: logged entries, the user
//! profile, configuration, and the two ports the engine is driven through
//! (`Clock` for time, `Persistence` for durable storage).

pub mod calendar;
pub mod config;
pub mod error;
pub mod profile;
pub mod types;

pub use calendar::{Calendar, Clock, ManualClock, SystemClock};
pub use config::{InnerZenConfig, TodayPolicy};
pub use error::CoreError;
pub use profile::{
    level_for_xp, Condition, Consent, OnboardingSeed, ResponseStyle, UserProfile, XP_PER_LEVEL,
};
pub use types::{Intensity, JournalEntry, MoodEntry, MoodTag, Timeframe, Timestamped};

use async_trait::async_trait;

/// Storage keys, relative to the configured namespace.
pub mod keys {
    pub const PROFILE: &str = "mental_health_profile";
    pub const MOOD_HISTORY: &str = "mood_history";
    pub const JOURNAL_ENTRIES: &str = "journal_entries";
}

/// Durable storage for the profile and both logs.
///
/// The engine treats every call as best-effort: a failure is logged and
/// reported to the UI, never propagated as a command failure.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn load_profile(&self) -> anyhow::Result<Option<UserProfile>>;
    async fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()>;
    async fn load_mood_log(&self) -> anyhow::Result<Vec<MoodEntry>>;
    async fn save_mood_log(&self, log: &[MoodEntry]) -> anyhow::Result<()>;
    async fn load_journal_log(&self) -> anyhow::Result<Vec<JournalEntry>>;
    async fn save_journal_log(&self, log: &[JournalEntry]) -> anyhow::Result<()>;
}
