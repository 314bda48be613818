//! Integration tests for WellbeingEngine
//!
//! Time is pinned with ManualClock; the journal analysis delay runs on
//! tokio's paused clock.

use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use innerzen_core::{
    Consent, InnerZenConfig, JournalEntry, ManualClock, MoodEntry, MoodTag, OnboardingSeed,
    Persistence, ResponseStyle, Timeframe, TodayPolicy, UserProfile,
};
use innerzen_memory::{
    EngineError, EngineEvent, InMemoryStore, KeyValueStore, LevelUpSource, SqliteStore,
    WellbeingEngine,
};
use innerzen_triage::FixedChooser;
use std::sync::Arc;
use tokio::sync::broadcast;

fn start() -> DateTime<Utc> {
    // a Monday
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}

fn seed(crisis_support: Consent) -> OnboardingSeed {
    OnboardingSeed {
        response_style: ResponseStyle::Gentle,
        crisis_support,
        ..Default::default()
    }
}

struct Harness {
    engine: WellbeingEngine,
    clock: Arc<ManualClock>,
    store: Arc<InMemoryStore>,
    events: broadcast::Receiver<EngineEvent>,
}

async fn harness_with(config: InnerZenConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(start()));
    let store = Arc::new(InMemoryStore::new("innerzen"));
    let engine = WellbeingEngine::with_parts(
        config,
        store.clone(),
        clock.clone(),
        Arc::new(FixedChooser::default()),
    );
    let events = engine.subscribe();
    engine.restore().await;
    Harness {
        engine,
        clock,
        store,
        events,
    }
}

async fn harness() -> Harness {
    harness_with(InnerZenConfig::default()).await
}

async fn onboarded() -> Harness {
    let h = harness().await;
    h.engine.complete_onboarding(seed(Consent::Yes)).await;
    h
}

fn drain(events: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn test_commands_require_onboarding() {
    let h = harness().await;
    assert!(h.engine.profile().await.is_none());

    assert!(matches!(
        h.engine.submit_mood_raw("happy", 7).await,
        Err(EngineError::OnboardingRequired)
    ));
    assert!(matches!(
        h.engine.submit_journal("A long enough journal entry").await,
        Err(EngineError::OnboardingRequired)
    ));
    assert!(matches!(
        h.engine.send_chat_message("hello").await,
        Err(EngineError::OnboardingRequired)
    ));
    assert!(matches!(
        h.engine.request_analysis(Timeframe::Week).await,
        Err(EngineError::OnboardingRequired)
    ));
}

#[tokio::test]
async fn test_invalid_mood_input_rejected() {
    let h = onboarded().await;
    assert!(matches!(
        h.engine.submit_mood_raw("ecstatic", 5).await,
        Err(EngineError::Invalid(_))
    ));
    assert!(matches!(
        h.engine.submit_mood_raw("happy", 11).await,
        Err(EngineError::Invalid(_))
    ));
    assert!(h.engine.mood_log().await.is_empty());
    assert_eq!(h.engine.profile().await.unwrap().xp(), 0);
}

#[tokio::test]
async fn test_mood_submission_persists_and_levels_up() {
    let mut h = onboarded().await;

    for i in 0..10 {
        h.clock.advance(Duration::minutes(5));
        let receipt = h.engine.submit_mood_raw("Calm", 6).await.unwrap();
        assert_eq!(receipt.profile.xp(), (i + 1) * 10);
    }

    let profile = h.engine.profile().await.unwrap();
    assert_eq!(profile.level(), 2);
    assert_eq!(profile.streak, 1);
    assert_eq!(profile.current_mood, Some(MoodTag::Calm));

    let stored = h.store.load_profile().await.unwrap().unwrap();
    assert_eq!(stored, profile);
    assert_eq!(h.store.load_mood_log().await.unwrap().len(), 10);

    let level_ups: Vec<_> = drain(&mut h.events)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::LevelUp(l) => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(level_ups.len(), 1);
    assert_eq!(level_ups[0].level, 2);
    assert_eq!(level_ups[0].source, LevelUpSource::Mood);
}

#[tokio::test]
async fn test_streak_after_missed_day() {
    let h = onboarded().await;
    for _ in 0..5 {
        h.engine.submit_mood_raw("happy", 8).await.unwrap();
        h.clock.advance(Duration::days(1));
    }
    assert_eq!(h.engine.profile().await.unwrap().streak, 5);

    // day 6 is skipped
    h.clock.advance(Duration::days(1));
    let receipt = h.engine.submit_mood_raw("happy", 8).await.unwrap();
    assert_eq!(receipt.progress.streak, 1);
}

#[tokio::test]
async fn test_current_streak_follows_today_policy() {
    let mut config = InnerZenConfig::default();
    config.engagement.today_policy = TodayPolicy::Breaking;
    let h = harness_with(config).await;
    h.engine.complete_onboarding(seed(Consent::No)).await;

    for _ in 0..3 {
        h.engine.submit_mood_raw("calm", 6).await.unwrap();
        h.clock.advance(Duration::days(1));
    }
    // nothing logged yet today
    assert_eq!(h.engine.current_streak().await, 0);

    let h = onboarded().await;
    for _ in 0..3 {
        h.engine.submit_mood_raw("calm", 6).await.unwrap();
        h.clock.advance(Duration::days(1));
    }
    assert_eq!(h.engine.current_streak().await, 3);
}

#[tokio::test]
async fn test_short_journal_rejected() {
    let h = onboarded().await;
    let err = h.engine.submit_journal("  ok  ").await.unwrap_err();
    assert!(matches!(err, EngineError::JournalTooShort { min_chars: 10 }));
    assert!(h.engine.journal_log().await.is_empty());
    assert_eq!(h.engine.profile().await.unwrap().xp(), 0);
    assert!(!h.engine.analysis_pending().await);
}

#[tokio::test(start_paused = true)]
async fn test_journal_applied_after_delay() {
    let mut h = onboarded().await;

    let pending = h
        .engine
        .submit_journal("Today I felt grateful for a long morning walk.")
        .await
        .unwrap();
    assert!(h.engine.analysis_pending().await);
    assert!(h.engine.journal_log().await.is_empty());

    let receipt = pending.wait().await.unwrap();
    assert_eq!(receipt.entry.mood, MoodTag::Peaceful);
    assert!(receipt.entry.ai_insight.is_some());
    assert_eq!(receipt.entry.timestamp, start());
    assert_eq!(receipt.profile.xp(), 15);
    assert_eq!(receipt.progress.streak, 1);

    assert_eq!(h.engine.journal_log().await.len(), 1);
    assert_eq!(h.store.load_journal_log().await.unwrap().len(), 1);
    assert!(drain(&mut h.events)
        .iter()
        .any(|e| matches!(e, EngineEvent::JournalSaved(entry) if entry.id == receipt.entry.id)));
}

#[tokio::test(start_paused = true)]
async fn test_journal_level_up_event() {
    let mut h = onboarded().await;
    for _ in 0..9 {
        h.engine.submit_mood_raw("calm", 6).await.unwrap();
    }
    drain(&mut h.events);

    let receipt = h
        .engine
        .submit_journal("Wrote down three goals for next week.")
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(receipt.profile.xp(), 105);
    assert_eq!(receipt.profile.level(), 2);

    let level_ups: Vec<_> = drain(&mut h.events)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::LevelUp(l) => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(level_ups.len(), 1);
    assert_eq!(level_ups[0].level, 2);
    assert_eq!(level_ups[0].source, LevelUpSource::Journal);
}

#[tokio::test(start_paused = true)]
async fn test_newer_journal_supersedes_pending_one() {
    let mut h = onboarded().await;

    let first = h
        .engine
        .submit_journal("First draft of today's reflection")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    let second = h
        .engine
        .submit_journal("Second, final version of today's reflection")
        .await
        .unwrap();
    assert!(second.generation() > first.generation());

    assert!(matches!(first.wait().await, Err(EngineError::Superseded)));
    let receipt = second.wait().await.unwrap();
    assert_eq!(receipt.entry.content, "Second, final version of today's reflection");

    let log = h.engine.journal_log().await;
    assert_eq!(log.len(), 1);
    assert_eq!(h.engine.profile().await.unwrap().xp(), 15);

    let events = drain(&mut h.events);
    assert!(events
        .iter()
        .any(|e| matches!(e, EngineEvent::AnalysisSuperseded { generation } if *generation == 1)));
}

#[tokio::test]
async fn test_crisis_message_raises_event() {
    let mut h = onboarded().await;

    let transcript = h.engine.transcript().await.unwrap();
    assert_eq!(transcript.len(), 1);

    let turn = h.engine.send_chat_message("I want to KILL MYSELF").await.unwrap();
    assert!(turn.classification.is_crisis);
    assert!(turn.reply.is_emergency);
    assert!(turn.reply.content.contains("Call 988"));

    let events = drain(&mut h.events);
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::CrisisDetected { show_banner: true, matched } if matched.contains(&"kill myself")
    )));
    assert_eq!(h.engine.transcript().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_topic_reply_uses_profile_style() {
    let h = onboarded().await;
    let turn = h.engine.send_chat_message("I've been so stressed at work").await.unwrap();
    assert!(!turn.classification.is_crisis);
    assert!(turn.reply.content.starts_with("Feeling overwhelmed is so human"));
}

#[tokio::test]
async fn test_week_analysis_scenario() {
    let h = onboarded().await;
    for (mood, intensity) in [("happy", 8), ("sad", 3), ("happy", 7)] {
        h.engine.submit_mood_raw(mood, intensity).await.unwrap();
        h.clock.advance(Duration::days(1));
    }

    let report = h.engine.request_analysis(Timeframe::Week).await.unwrap();
    assert_eq!(report.mood_count, 3);
    assert!((report.stats.average - 6.0).abs() < 1e-9);
    assert_eq!(report.stats.most_common, Some(MoodTag::Happy));
}

#[tokio::test]
async fn test_today_summary_and_achievements() {
    let h = onboarded().await;
    h.engine.submit_mood_raw("calm", 4).await.unwrap();
    h.clock.advance(Duration::hours(1));
    h.engine.submit_mood_raw("happy", 8).await.unwrap();

    let summary = h.engine.today_summary().await;
    assert_eq!(summary.mood_count, 2);
    assert!((summary.average_intensity - 6.0).abs() < 1e-9);

    let unlocked: Vec<_> = h
        .engine
        .achievements()
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.unlocked)
        .collect();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(h.engine.greeting().await.unwrap(), "Good morning, beautiful soul 🌸");
}

struct FailingStore;

#[async_trait]
impl Persistence for FailingStore {
    async fn load_profile(&self) -> anyhow::Result<Option<UserProfile>> {
        bail!("disk unavailable")
    }
    async fn save_profile(&self, _: &UserProfile) -> anyhow::Result<()> {
        bail!("disk unavailable")
    }
    async fn load_mood_log(&self) -> anyhow::Result<Vec<MoodEntry>> {
        bail!("disk unavailable")
    }
    async fn save_mood_log(&self, _: &[MoodEntry]) -> anyhow::Result<()> {
        bail!("disk unavailable")
    }
    async fn load_journal_log(&self) -> anyhow::Result<Vec<JournalEntry>> {
        bail!("disk unavailable")
    }
    async fn save_journal_log(&self, _: &[JournalEntry]) -> anyhow::Result<()> {
        bail!("disk unavailable")
    }
}

#[tokio::test]
async fn test_persistence_failures_are_warnings() {
    let engine = WellbeingEngine::with_parts(
        InnerZenConfig::default(),
        Arc::new(FailingStore),
        Arc::new(ManualClock::new(start())),
        Arc::new(FixedChooser::default()),
    );
    let mut events = engine.subscribe();
    engine.restore().await;
    assert!(engine.profile().await.is_none());

    engine.complete_onboarding(seed(Consent::No)).await;
    let receipt = engine.submit_mood_raw("neutral", 5).await.unwrap();
    assert_eq!(receipt.profile.xp(), 10);

    let operations: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::PersistenceWarning { operation, .. } => Some(operation),
            _ => None,
        })
        .collect();
    assert_eq!(
        operations,
        vec![
            "load_profile",
            "load_mood_log",
            "load_journal_log",
            "save_profile",
            "save_mood_log",
            "save_profile"
        ]
    );
}

#[tokio::test]
async fn test_restore_from_sqlite_after_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("innerzen.db");
    let clock = Arc::new(ManualClock::new(start()));

    {
        let store = Arc::new(SqliteStore::open(&path, "innerzen").await.unwrap());
        let engine = WellbeingEngine::with_parts(
            InnerZenConfig::default(),
            store,
            clock.clone(),
            Arc::new(FixedChooser::default()),
        );
        engine.restore().await;
        engine.complete_onboarding(seed(Consent::No)).await;
        engine.submit_mood_raw("motivated", 9).await.unwrap();
        clock.advance(Duration::days(1));
        engine.submit_mood_raw("calm", 7).await.unwrap();
    }

    let store = Arc::new(SqliteStore::open(&path, "innerzen").await.unwrap());
    let engine = WellbeingEngine::with_parts(
        InnerZenConfig::default(),
        store,
        clock.clone(),
        Arc::new(FixedChooser::default()),
    );
    engine.restore().await;

    let profile = engine.profile().await.unwrap();
    assert_eq!(profile.xp(), 20);
    assert_eq!(profile.streak, 2);
    assert_eq!(engine.mood_log().await.len(), 2);
    assert_eq!(engine.current_streak().await, 2);
}

#[tokio::test]
async fn test_restore_normalizes_drifted_level() {
    let store = Arc::new(InMemoryStore::new("innerzen"));
    store
        .put(
            "mental_health_profile",
            r#"{"level":7,"xp":250,"streak":0,"responseStyle":"neutral"}"#.to_string(),
        )
        .await
        .unwrap();

    let engine = WellbeingEngine::with_parts(
        InnerZenConfig::default(),
        store,
        Arc::new(ManualClock::new(start())),
        Arc::new(FixedChooser::default()),
    );
    engine.restore().await;
    assert_eq!(engine.profile().await.unwrap().level(), 3);
}
