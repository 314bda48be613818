//! # InnerZen Insights
//!
//! Pure analytics over snapshots of the mood and journal logs. Nothing here
//! owns state: every function takes the logs it needs and returns values.
//!
//! - [`window`]: timeframe filtering
//! - [`stats`]: average, trend, variance, most common mood
//! - [`patterns`]: weekend, stability and journaling heuristics
//! - [`insights`]: ordered natural-language insights
//! - [`reflection`]: offline analysis of a single journal entry

pub mod insights;
pub mod patterns;
pub mod reflection;
pub mod report;
pub mod stats;
pub mod thresholds;
pub mod window;

pub use insights::{generate_insights, Insight, InsightKind};
pub use patterns::{detect_patterns, Impact, Pattern, PatternKind};
pub use reflection::{reflect, Reflection};
pub use report::{analyze, AnalysisReport};
pub use stats::{mood_stats, most_common_mood, MoodStats};
pub use window::{cutoff, filter_by_timeframe};
