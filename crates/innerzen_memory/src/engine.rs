//! Wellbeing Engine - the single actor the UI talks to
//!
//! Owns the profile and both activity logs, applies the engagement rules,
//! delegates analytics and triage, and flushes every change to persistence.
//!
//! Lock ordering (to prevent deadlocks):
//!   mutation_lock → state
//!
//! Journal analysis runs as a delayed task. Each submission takes a new
//! generation token and aborts the previous task; only the latest token's
//! completion is applied.

use chrono::{DateTime, Timelike, Utc};
use innerzen_core::{
    Calendar, Clock, CoreError, InnerZenConfig, Intensity, JournalEntry, MoodEntry, MoodTag,
    OnboardingSeed, Persistence, SystemClock, Timeframe, UserProfile,
};
use innerzen_insights::{analyze, reflect, AnalysisReport};
use innerzen_triage::{greeting, Chooser, Conversation, ConversationError, Message, RandomChooser, Turn};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::engagement::{
    achievements, record_journal, record_mood, streak, today_summary, AchievementStatus, LevelUp,
    Progress, TodaySummary,
};
use crate::log::EventLog;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("onboarding has not been completed")]
    OnboardingRequired,
    #[error("journal entry must be at least {min_chars} characters")]
    JournalTooShort { min_chars: usize },
    #[error("journal analysis was superseded by a newer entry")]
    Superseded,
    #[error(transparent)]
    Invalid(#[from] CoreError),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

/// Notifications for the UI layer.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    LevelUp(LevelUp),
    CrisisDetected {
        matched: Vec<&'static str>,
        show_banner: bool,
    },
    JournalSaved(JournalEntry),
    AnalysisSuperseded {
        generation: u64,
    },
    PersistenceWarning {
        operation: &'static str,
        error: String,
    },
}

/// Result of a mood submission.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodReceipt {
    pub entry: MoodEntry,
    pub progress: Progress,
    pub profile: UserProfile,
}

/// Result of an applied journal analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalReceipt {
    pub entry: JournalEntry,
    pub progress: Progress,
    pub profile: UserProfile,
}

/// Handle to a journal entry whose analysis is still running.
#[derive(Debug)]
pub struct PendingJournal {
    generation: u64,
    rx: oneshot::Receiver<JournalReceipt>,
}

impl PendingJournal {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the analysis. Fails with `Superseded` if a newer entry
    /// replaced this one first.
    pub async fn wait(self) -> Result<JournalReceipt, EngineError> {
        self.rx.await.map_err(|_| EngineError::Superseded)
    }
}

struct PendingAnalysis {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct EngineState {
    profile: Option<UserProfile>,
    moods: EventLog<MoodEntry>,
    journals: EventLog<JournalEntry>,
    conversation: Option<Conversation>,
    pending_analysis: Option<PendingAnalysis>,
    generation: u64,
}

struct Inner {
    state: RwLock<EngineState>,
    /// Serializes commands so a read-modify-persist sequence never interleaves.
    mutation_lock: Mutex<()>,
    persistence: Arc<dyn Persistence>,
    clock: Arc<dyn Clock>,
    chooser: Arc<dyn Chooser>,
    calendar: Calendar,
    config: InnerZenConfig,
    events: broadcast::Sender<EngineEvent>,
}

/// Cloneable handle to the engine.
#[derive(Clone)]
pub struct WellbeingEngine {
    inner: Arc<Inner>,
}

impl WellbeingEngine {
    /// Engine on the system clock with random reply selection.
    pub fn new(config: InnerZenConfig, persistence: Arc<dyn Persistence>) -> Self {
        Self::with_parts(
            config,
            persistence,
            Arc::new(SystemClock),
            Arc::new(RandomChooser),
        )
    }

    pub fn with_parts(
        config: InnerZenConfig,
        persistence: Arc<dyn Persistence>,
        clock: Arc<dyn Clock>,
        chooser: Arc<dyn Chooser>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(EngineState::default()),
                mutation_lock: Mutex::new(()),
                persistence,
                clock,
                chooser,
                calendar: config.calendar.calendar(),
                config,
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    fn emit(&self, event: EngineEvent) {
        // no subscribers is fine
        let _ = self.inner.events.send(event);
    }

    fn warn_persistence(&self, operation: &'static str, error: anyhow::Error) {
        tracing::warn!("Persistence {} failed: {:#}", operation, error);
        self.emit(EngineEvent::PersistenceWarning {
            operation,
            error: format!("{:#}", error),
        });
    }

    /// Load the profile and logs from persistence.
    ///
    /// Failures are reported as warnings and leave the engine on defaults:
    /// empty logs, and no profile (onboarding required).
    pub async fn restore(&self) {
        let _guard = self.inner.mutation_lock.lock().await;
        let persistence = &self.inner.persistence;

        let profile = match persistence.load_profile().await {
            Ok(Some(mut profile)) => {
                profile.normalize();
                tracing::info!("Loaded profile at level {}", profile.level());
                Some(profile)
            }
            Ok(None) => {
                tracing::info!("No stored profile, onboarding required");
                None
            }
            Err(e) => {
                self.warn_persistence("load_profile", e);
                None
            }
        };

        let moods = match persistence.load_mood_log().await {
            Ok(entries) => entries,
            Err(e) => {
                self.warn_persistence("load_mood_log", e);
                Vec::new()
            }
        };

        let journals = match persistence.load_journal_log().await {
            Ok(entries) => entries,
            Err(e) => {
                self.warn_persistence("load_journal_log", e);
                Vec::new()
            }
        };

        tracing::info!(
            "Restored {} mood entries and {} journal entries",
            moods.len(),
            journals.len()
        );

        let mut state = self.inner.state.write().await;
        state.profile = profile;
        state.moods = EventLog::from_persisted(moods);
        state.journals = EventLog::from_persisted(journals);
        state.conversation = None;
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Create the profile from the onboarding answers.
    ///
    /// Completing onboarding again replaces the answers and keeps progress.
    pub async fn complete_onboarding(&self, seed: OnboardingSeed) -> UserProfile {
        let _guard = self.inner.mutation_lock.lock().await;

        let profile = {
            let mut state = self.inner.state.write().await;
            let profile = match state.profile.take() {
                Some(existing) => {
                    tracing::info!("Onboarding repeated, keeping progress");
                    let mut fresh = UserProfile::from_onboarding(seed);
                    fresh.award_xp(existing.xp());
                    fresh.streak = existing.streak;
                    fresh.current_mood = existing.current_mood;
                    fresh
                }
                None => {
                    tracing::info!("Onboarding completed");
                    UserProfile::from_onboarding(seed)
                }
            };
            state.profile = Some(profile.clone());
            // new answers may change the reply style
            state.conversation = None;
            profile
        };

        if let Err(e) = self.inner.persistence.save_profile(&profile).await {
            self.warn_persistence("save_profile", e);
        }
        profile
    }

    /// Log a mood from raw UI input.
    pub async fn submit_mood_raw(&self, mood: &str, intensity: i64) -> Result<MoodReceipt, EngineError> {
        let mood: MoodTag = mood.parse()?;
        let intensity = Intensity::new(intensity)?;
        self.submit_mood(mood, intensity).await
    }

    pub async fn submit_mood(&self, mood: MoodTag, intensity: Intensity) -> Result<MoodReceipt, EngineError> {
        let _guard = self.inner.mutation_lock.lock().await;
        let now = self.inner.clock.now();
        let entry = MoodEntry::new(mood, intensity, now);

        let (receipt, log) = {
            let mut state = self.inner.state.write().await;
            let EngineState { profile, moods, .. } = &mut *state;
            let profile = profile.as_mut().ok_or(EngineError::OnboardingRequired)?;

            let progress = record_mood(
                profile,
                moods,
                entry.clone(),
                &self.inner.calendar,
                self.inner.config.engagement.today_policy,
            );
            let receipt = MoodReceipt {
                entry,
                progress,
                profile: profile.clone(),
            };
            (receipt, moods.entries().to_vec())
        };

        tracing::info!("Mood logged: {} ({})", receipt.entry.mood, receipt.entry.intensity.get());
        if let Err(e) = self.inner.persistence.save_mood_log(&log).await {
            self.warn_persistence("save_mood_log", e);
        }
        if let Err(e) = self.inner.persistence.save_profile(&receipt.profile).await {
            self.warn_persistence("save_profile", e);
        }
        if let Some(level_up) = receipt.progress.level_up {
            tracing::info!("{}", level_up.message());
            self.emit(EngineEvent::LevelUp(level_up));
        }
        Ok(receipt)
    }

    /// Accept a journal entry and schedule its analysis.
    ///
    /// Nothing is appended and no XP is awarded until the analysis completes.
    /// A newer submission supersedes one still being analyzed.
    pub async fn submit_journal(&self, text: &str) -> Result<PendingJournal, EngineError> {
        let min_chars = self.inner.config.journal.min_chars;
        let content = text.trim();
        if content.chars().count() < min_chars {
            return Err(EngineError::JournalTooShort { min_chars });
        }

        let _guard = self.inner.mutation_lock.lock().await;
        let submitted_at = self.inner.clock.now();
        let mut state = self.inner.state.write().await;
        if state.profile.is_none() {
            return Err(EngineError::OnboardingRequired);
        }

        if let Some(previous) = state.pending_analysis.take() {
            if !previous.handle.is_finished() {
                previous.handle.abort();
                tracing::info!("Journal analysis {} superseded", previous.generation);
                self.emit(EngineEvent::AnalysisSuperseded {
                    generation: previous.generation,
                });
            }
        }

        state.generation += 1;
        let generation = state.generation;
        let (tx, rx) = oneshot::channel();
        let engine = self.clone();
        let content = content.to_string();
        let delay = self.inner.config.journal.analysis_delay();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(receipt) = engine.apply_journal(generation, content, submitted_at).await {
                let _ = tx.send(receipt);
            }
        });
        state.pending_analysis = Some(PendingAnalysis { generation, handle });

        tracing::debug!("Journal analysis {} scheduled in {:?}", generation, delay);
        Ok(PendingJournal { generation, rx })
    }

    async fn apply_journal(
        &self,
        generation: u64,
        content: String,
        submitted_at: DateTime<Utc>,
    ) -> Option<JournalReceipt> {
        let _guard = self.inner.mutation_lock.lock().await;

        let (receipt, log) = {
            let mut state = self.inner.state.write().await;
            if state.generation != generation {
                tracing::info!("Dropping stale journal analysis {}", generation);
                return None;
            }
            state.pending_analysis = None;

            let reflection = reflect(&content);
            let entry = JournalEntry {
                id: Uuid::new_v4(),
                content,
                mood: reflection.mood,
                timestamp: submitted_at,
                emotions: reflection.emotions,
                ai_insight: Some(reflection.insight),
            };

            let EngineState {
                profile, journals, ..
            } = &mut *state;
            let profile = profile.as_mut()?;
            let progress = record_journal(
                profile,
                journals,
                entry.clone(),
                &self.inner.calendar,
                self.inner.config.engagement.today_policy,
            );
            let receipt = JournalReceipt {
                entry,
                progress,
                profile: profile.clone(),
            };
            (receipt, journals.entries().to_vec())
        };

        tracing::info!("Journal entry {} saved as {}", receipt.entry.id, receipt.entry.mood);
        if let Err(e) = self.inner.persistence.save_journal_log(&log).await {
            self.warn_persistence("save_journal_log", e);
        }
        if let Err(e) = self.inner.persistence.save_profile(&receipt.profile).await {
            self.warn_persistence("save_profile", e);
        }

        self.emit(EngineEvent::JournalSaved(receipt.entry.clone()));
        if let Some(level_up) = receipt.progress.level_up {
            tracing::info!("{}", level_up.message());
            self.emit(EngineEvent::LevelUp(level_up));
        }
        Some(receipt)
    }

    /// Statistics, patterns and insights for one timeframe.
    pub async fn request_analysis(&self, timeframe: Timeframe) -> Result<AnalysisReport, EngineError> {
        let now = self.inner.clock.now();
        let state = self.inner.state.read().await;
        if state.profile.is_none() {
            return Err(EngineError::OnboardingRequired);
        }
        Ok(analyze(
            state.moods.entries(),
            state.journals.entries(),
            timeframe,
            now,
            &self.inner.calendar,
        ))
    }

    /// One chat turn. Opens the conversation on first use.
    pub async fn send_chat_message(&self, text: &str) -> Result<Turn, EngineError> {
        let _guard = self.inner.mutation_lock.lock().await;
        let now = self.inner.clock.now();

        let turn = {
            let mut state = self.inner.state.write().await;
            let EngineState {
                profile,
                conversation,
                ..
            } = &mut *state;
            let profile = profile.as_ref().ok_or(EngineError::OnboardingRequired)?;
            let conversation = conversation.get_or_insert_with(|| {
                Conversation::open(profile.response_style, profile.wants_crisis_support(), now)
            });
            conversation.exchange(text, self.inner.chooser.as_ref(), now)?
        };

        if turn.classification.is_crisis {
            tracing::warn!("Crisis detected in chat message");
            self.emit(EngineEvent::CrisisDetected {
                matched: turn.classification.matched.clone(),
                show_banner: turn.raise_banner,
            });
        }
        Ok(turn)
    }

    /// End the chat session; the next message starts a new one.
    pub async fn reset_conversation(&self) {
        let _guard = self.inner.mutation_lock.lock().await;
        self.inner.state.write().await.conversation = None;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn profile(&self) -> Option<UserProfile> {
        self.inner.state.read().await.profile.clone()
    }

    pub async fn mood_log(&self) -> Vec<MoodEntry> {
        self.inner.state.read().await.moods.entries().to_vec()
    }

    pub async fn journal_log(&self) -> Vec<JournalEntry> {
        self.inner.state.read().await.journals.entries().to_vec()
    }

    /// Messages of the current chat session, welcome message first.
    pub async fn transcript(&self) -> Result<Vec<Message>, EngineError> {
        let _guard = self.inner.mutation_lock.lock().await;
        let now = self.inner.clock.now();
        let mut state = self.inner.state.write().await;
        let EngineState {
            profile,
            conversation,
            ..
        } = &mut *state;
        let profile = profile.as_ref().ok_or(EngineError::OnboardingRequired)?;
        let conversation = conversation.get_or_insert_with(|| {
            Conversation::open(profile.response_style, profile.wants_crisis_support(), now)
        });
        Ok(conversation.transcript().to_vec())
    }

    /// Mood streak as of now, under the configured today policy.
    pub async fn current_streak(&self) -> u32 {
        let now = self.inner.clock.now();
        let state = self.inner.state.read().await;
        streak(
            state.moods.entries(),
            now,
            &self.inner.calendar,
            self.inner.config.engagement.today_policy,
        )
    }

    pub async fn achievements(&self) -> Result<Vec<AchievementStatus>, EngineError> {
        let state = self.inner.state.read().await;
        let profile = state.profile.as_ref().ok_or(EngineError::OnboardingRequired)?;
        Ok(achievements(profile, state.moods.len(), state.journals.len()))
    }

    pub async fn today_summary(&self) -> TodaySummary {
        let now = self.inner.clock.now();
        let state = self.inner.state.read().await;
        today_summary(&state.moods, &state.journals, &self.inner.calendar, now)
    }

    /// Dashboard greeting for the profile's style at the local hour.
    pub async fn greeting(&self) -> Result<&'static str, EngineError> {
        let now = self.inner.clock.now();
        let style = self
            .inner
            .state
            .read()
            .await
            .profile
            .as_ref()
            .map(|p| p.response_style)
            .ok_or(EngineError::OnboardingRequired)?;
        let hour = now.with_timezone(&self.inner.calendar.offset()).hour();
        Ok(greeting(style, hour))
    }

    /// Whether a journal analysis is still waiting to be applied.
    pub async fn analysis_pending(&self) -> bool {
        self.inner
            .state
            .read()
            .await
            .pending_analysis
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }
}
