//! Logged activity: mood check-ins and journal entries.
//!
//! Entries are immutable once built. Validation happens in the constructors
//! of the boundary types (`MoodTag`, `Intensity`), so an entry that exists is
//! always well-formed.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The closed set of moods a user can check in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTag {
    Happy,
    Calm,
    Anxious,
    Sad,
    Motivated,
    Neutral,
    Stressed,
    Peaceful,
}

impl MoodTag {
    pub const ALL: [MoodTag; 8] = [
        MoodTag::Happy,
        MoodTag::Calm,
        MoodTag::Anxious,
        MoodTag::Sad,
        MoodTag::Motivated,
        MoodTag::Neutral,
        MoodTag::Stressed,
        MoodTag::Peaceful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTag::Happy => "happy",
            MoodTag::Calm => "calm",
            MoodTag::Anxious => "anxious",
            MoodTag::Sad => "sad",
            MoodTag::Motivated => "motivated",
            MoodTag::Neutral => "neutral",
            MoodTag::Stressed => "stressed",
            MoodTag::Peaceful => "peaceful",
        }
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MoodTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownMood(s.to_string()))
    }
}

/// Self-reported mood intensity, 1 (lowest) to 10 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Result<Self, CoreError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::IntensityOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl TryFrom<i64> for Intensity {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

/// Anything that sits on the timeline of a log.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// A single mood check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: MoodTag,
    pub intensity: Intensity,
    pub timestamp: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(mood: MoodTag, intensity: Intensity, timestamp: DateTime<Utc>) -> Self {
        Self {
            mood,
            intensity,
            timestamp,
        }
    }
}

impl Timestamped for MoodEntry {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A reflective journal entry together with the result of its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub content: String,
    /// Mood derived from the text by the analysis step
    pub mood: MoodTag,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
}

impl Timestamped for JournalEntry {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Named analysis window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    #[default]
    Month,
    All,
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "all" => Ok(Timeframe::All),
            _ => Err(CoreError::UnknownTimeframe(s.to_string())),
        }
    }
}
