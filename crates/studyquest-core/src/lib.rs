//! # StudyQuest Core Library
//!
//! This library provides the session/reward engine behind the StudyQuest
//! gamified study tracker. All operations are available through the
//! standalone CLI binary; any other front end is a thin layer that renders
//! the engine's snapshots and events and issues commands back.
//!
//! ## Architecture
//!
//! - **Timer**: a one-second-resolution pomodoro state machine, driven by
//!   `tick()` from a [`ClockDriver`] or any other caller
//! - **Sessions**: wall-clock study session lifecycle with bounded history
//! - **Ledger**: quests, achievements, XP aggregates and the study streak
//! - **Rewards**: pluggable policy for session completion XP
//! - **Storage**: SQLite session archive/snapshot store and TOML configuration
//!
//! ## Key Components
//!
//! - [`PomodoroTimer`]: focus/break state machine
//! - [`SessionTracker`]: open session plus closed-session history
//! - [`XpLedger`]: quest, achievement and XP bookkeeping
//! - [`StudyEngine`]: the components wired together for snapshot/restore
//! - [`Database`]: session archive and key-value persistence
//! - [`Config`]: application configuration management

pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod reward;
pub mod session;
pub mod storage;
pub mod timer;

pub use engine::{EngineSnapshot, StopOutcome, StudyEngine};
pub use error::{ConfigError, CoreError, DatabaseError, EngineError};
pub use events::Event;
pub use ledger::{
    level_for_xp, next_level_threshold, Achievement, Quest, QuestKind, QuestStatus, XpLedger,
    XpSummary,
};
pub use reward::{
    FixedReward, FocusTimeReward, RandomReward, RewardConfig, RewardKind, RewardPolicy,
};
pub use session::{SessionTracker, StudySession, HISTORY_LIMIT};
pub use storage::{Config, Database, Stats, StudySettings};
pub use timer::{ClockDriver, Phase, PhasePlan, PomodoroSession, PomodoroTimer, TimerState};
