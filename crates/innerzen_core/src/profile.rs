//! The user's persistent profile and the XP → level curve.
//!
//! `level` is never set directly: it is recomputed from `xp` every time XP is
//! awarded, and it never moves backwards.

use crate::error::CoreError;
use crate::types::MoodTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// XP needed to climb one level.
pub const XP_PER_LEVEL: u32 = 100;

/// Level for a given XP total: `floor(xp / 100) + 1`.
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Tone of the companion's replies, chosen at onboarding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    Gentle,
    Motivational,
    #[default]
    Neutral,
}

impl FromStr for ResponseStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gentle" => Ok(ResponseStyle::Gentle),
            "motivational" => Ok(ResponseStyle::Motivational),
            "neutral" => Ok(ResponseStyle::Neutral),
            _ => Err(CoreError::UnknownStyle(s.to_string())),
        }
    }
}

/// Yes / no / prefer-not-to-say answer used by several onboarding questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Consent {
    Yes,
    No,
    #[default]
    PreferNotToSay,
}

impl FromStr for Consent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "yes" => Ok(Consent::Yes),
            "no" => Ok(Consent::No),
            "prefer-not-to-say" => Ok(Consent::PreferNotToSay),
            _ => Err(CoreError::UnknownConsent(s.to_string())),
        }
    }
}

/// Mental-health history tags offered at onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Anxiety,
    Depression,
    Bipolar,
    Ptsd,
    Adhd,
    None,
    PreferNotToSay,
}

impl FromStr for Condition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "anxiety" => Ok(Condition::Anxiety),
            "depression" => Ok(Condition::Depression),
            "bipolar" | "bipolar-disorder" => Ok(Condition::Bipolar),
            "ptsd" => Ok(Condition::Ptsd),
            "adhd" => Ok(Condition::Adhd),
            "none" => Ok(Condition::None),
            "prefer-not-to-say" => Ok(Condition::PreferNotToSay),
            _ => Err(CoreError::UnknownCondition(s.to_string())),
        }
    }
}

/// Answers collected by the onboarding flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSeed {
    pub response_style: ResponseStyle,
    #[serde(default)]
    pub mental_health_history: BTreeSet<Condition>,
    #[serde(default)]
    pub current_treatment: Consent,
    #[serde(default)]
    pub medication: Consent,
    #[serde(default)]
    pub crisis_support: Consent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    level: u32,
    xp: u32,
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mood: Option<MoodTag>,
    pub response_style: ResponseStyle,
    #[serde(default)]
    pub mental_health_history: BTreeSet<Condition>,
    #[serde(default)]
    pub current_treatment: Consent,
    #[serde(default)]
    pub medication: Consent,
    #[serde(default)]
    pub crisis_support: Consent,
}

impl UserProfile {
    /// Fresh profile at level 1 with no XP, built from onboarding answers.
    pub fn from_onboarding(seed: OnboardingSeed) -> Self {
        Self {
            level: 1,
            xp: 0,
            streak: 0,
            current_mood: None,
            response_style: seed.response_style,
            mental_health_history: seed.mental_health_history,
            current_treatment: seed.current_treatment,
            medication: seed.medication,
            crisis_support: seed.crisis_support,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    /// Add XP and recompute the level. Returns the new level if it went up.
    pub fn award_xp(&mut self, amount: u32) -> Option<u32> {
        let previous = self.level;
        self.xp = self.xp.saturating_add(amount);
        self.level = previous.max(level_for_xp(self.xp));
        (self.level > previous).then_some(self.level)
    }

    /// XP earned since the current level started.
    pub fn xp_into_level(&self) -> u32 {
        self.xp % XP_PER_LEVEL
    }

    /// XP still needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u32 {
        XP_PER_LEVEL - self.xp_into_level()
    }

    pub fn wants_crisis_support(&self) -> bool {
        self.crisis_support == Consent::Yes
    }

    /// Re-derive `level` from `xp` after loading from storage.
    ///
    /// Returns true if the stored level had drifted.
    pub fn normalize(&mut self) -> bool {
        let derived = level_for_xp(self.xp);
        if self.level != derived {
            tracing::warn!(
                "Stored level {} disagrees with xp {} (expected {}), correcting",
                self.level,
                self.xp,
                derived
            );
            self.level = derived;
            return true;
        }
        false
    }
}
