use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::QuestStatus;
use crate::timer::{Phase, TimerState};

/// Every state change in the engine produces an Event.
/// The presentation layer renders them; snapshots answer polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero and the timer flipped to the next one.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        next_duration_secs: u64,
        completed_sessions: u32,
        /// The next phase is already running.
        auto_started: bool,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        phase: Phase,
        duration_minutes: u64,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: String,
        subject_id: String,
        at: DateTime<Utc>,
    },
    SessionEnded {
        session_id: String,
        subject_id: String,
        total_focus_minutes: u64,
        xp_earned: u32,
        lessons_completed: u32,
        quizzes_completed: u32,
        at: DateTime<Utc>,
    },
    XpAwarded {
        amount: u32,
        today_xp: u64,
        weekly_xp: u64,
        total_xp: u64,
        at: DateTime<Utc>,
    },
    QuestProgressed {
        quest_id: String,
        progress: u32,
        max_progress: u32,
        status: QuestStatus,
        at: DateTime<Utc>,
    },
    QuestCompleted {
        quest_id: String,
        reward_xp: u32,
        progress: u32,
        max_progress: u32,
        status: QuestStatus,
        at: DateTime<Utc>,
    },
    QuestClaimed {
        quest_id: String,
        reward_xp: u32,
        today_xp: u64,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        achievement_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    StreakUpdated {
        streak_days: u32,
        at: DateTime<Utc>,
    },
}
