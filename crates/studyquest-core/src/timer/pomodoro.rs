//! Pomodoro timer state machine.
//!
//! The timer counts down in whole seconds. It owns no thread or timer of its
//! own: a [`ClockDriver`](super::ClockDriver) (or any caller) invokes
//! `tick()` once per second while the timer is active.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -start-> Running -pause-> Paused -resume-> Running
//! Running -tick (reaches 0)-> next phase, inactive (or running if auto-start)
//! any -stop-> current phase reset to full length, inactive
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PomodoroTimer::new(PhasePlan::default());
//! timer.start(25)?;
//! // once per second:
//! if let Some(event) = timer.tick() { /* phase finished */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{minutes_to_secs, Phase, PhasePlan};
use crate::error::EngineError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Inactive with the current phase at full length.
    Idle,
    Running,
    /// Inactive part-way through a phase.
    Paused,
}

/// Observable timer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    /// Length of the current phase in minutes.
    pub duration_minutes: u64,
    pub is_active: bool,
    pub is_break: bool,
    /// Always within `0..=duration_minutes * 60`.
    pub remaining_seconds: u64,
    /// Finished focus/break cycles, counted on each break -> focus expiry.
    pub completed_sessions: u32,
    /// Focus phases that ran down to zero. Drives the long-break cadence.
    #[serde(default)]
    pub focus_blocks: u32,
}

impl PomodoroSession {
    fn idle(focus_min: u64) -> Self {
        Self {
            duration_minutes: focus_min,
            is_active: false,
            is_break: false,
            remaining_seconds: minutes_to_secs(focus_min),
            completed_sessions: 0,
            focus_blocks: 0,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        minutes_to_secs(self.duration_minutes)
    }

    pub fn phase(&self) -> Phase {
        Phase::from_is_break(self.is_break)
    }
}

impl Default for PomodoroSession {
    fn default() -> Self {
        Self::idle(PhasePlan::default().focus_min)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroTimer {
    #[serde(default)]
    plan: PhasePlan,
    session: PomodoroSession,
}

impl PomodoroTimer {
    /// Create an idle timer showing a full focus phase.
    pub fn new(plan: PhasePlan) -> Self {
        let session = PomodoroSession::idle(plan.focus_min);
        Self { plan, session }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &PomodoroSession {
        &self.session
    }

    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.session.remaining_seconds
    }

    pub fn completed_sessions(&self) -> u32 {
        self.session.completed_sessions
    }

    pub fn state(&self) -> TimerState {
        if self.session.is_active {
            TimerState::Running
        } else if self.session.remaining_seconds == self.session.total_seconds() {
            TimerState::Idle
        } else {
            TimerState::Paused
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.session.total_seconds();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.session.remaining_seconds as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            state: self.state(),
            phase: self.phase(),
            duration_minutes: self.session.duration_minutes,
            remaining_secs: self.session.remaining_seconds,
            total_secs: self.session.total_seconds(),
            progress_pct: self.phase_progress() * 100.0,
            completed_sessions: self.session.completed_sessions,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh focus phase of `duration_minutes`.
    ///
    /// Returns `Ok(None)` if the timer is already running.
    pub fn start(&mut self, duration_minutes: u64) -> Result<Option<Event>, EngineError> {
        if duration_minutes == 0 {
            return Err(EngineError::InvalidDuration {
                minutes: duration_minutes,
            });
        }
        if self.session.is_active {
            return Ok(None);
        }
        self.session.duration_minutes = duration_minutes;
        self.session.is_break = false;
        self.session.remaining_seconds = minutes_to_secs(duration_minutes);
        self.session.is_active = true;
        tracing::debug!(duration_minutes, "pomodoro started");
        Ok(Some(Event::TimerStarted {
            phase: Phase::Focus,
            duration_secs: self.session.remaining_seconds,
            at: Utc::now(),
        }))
    }

    /// Continue the current phase from where it stopped.
    pub fn resume(&mut self) -> Option<Event> {
        if self.session.is_active || self.session.remaining_seconds == 0 {
            return None;
        }
        self.session.is_active = true;
        tracing::debug!(remaining = self.session.remaining_seconds, "pomodoro resumed");
        Some(Event::TimerResumed {
            phase: self.phase(),
            remaining_secs: self.session.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.session.is_active {
            return None;
        }
        self.session.is_active = false;
        tracing::debug!(remaining = self.session.remaining_seconds, "pomodoro paused");
        Some(Event::TimerPaused {
            phase: self.phase(),
            remaining_secs: self.session.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Deactivate and reset the current phase to its full length.
    pub fn stop(&mut self) -> Event {
        self.session.is_active = false;
        self.session.remaining_seconds = self.session.total_seconds();
        tracing::debug!(phase = ?self.phase(), "pomodoro stopped");
        Event::TimerStopped {
            phase: self.phase(),
            remaining_secs: self.session.remaining_seconds,
            at: Utc::now(),
        }
    }

    /// Advance by one second. Returns `Some(Event::PhaseCompleted)` on expiry.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.session.is_active {
            return None;
        }
        self.session.remaining_seconds = self.session.remaining_seconds.saturating_sub(1);
        if self.session.remaining_seconds == 0 {
            return Some(self.expire());
        }
        None
    }

    /// Replace the phase plan. Takes effect at the next transition.
    pub fn apply_plan(&mut self, plan: PhasePlan) {
        let idle_focus = !self.session.is_active
            && !self.session.is_break
            && self.session.remaining_seconds == self.session.total_seconds();
        self.plan = plan;
        if idle_focus {
            self.session.duration_minutes = self.plan.focus_min;
            self.session.remaining_seconds = minutes_to_secs(self.plan.focus_min);
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expire(&mut self) -> Event {
        let from = self.phase();
        let to = match from {
            Phase::Focus => {
                self.session.focus_blocks = self.session.focus_blocks.saturating_add(1);
                self.session.duration_minutes = self.plan.break_after(self.session.focus_blocks);
                Phase::Break
            }
            Phase::Break => {
                self.session.completed_sessions = self.session.completed_sessions.saturating_add(1);
                self.session.duration_minutes = self.plan.focus_min;
                Phase::Focus
            }
        };
        self.session.is_break = to.is_break();
        self.session.remaining_seconds = self.session.total_seconds();
        self.session.is_active = self.plan.auto_start(to);

        tracing::info!(
            from = ?from,
            to = ?to,
            completed_sessions = self.session.completed_sessions,
            "pomodoro phase completed"
        );
        Event::PhaseCompleted {
            from,
            to,
            next_duration_secs: self.session.remaining_seconds,
            completed_sessions: self.session.completed_sessions,
            auto_started: self.session.is_active,
            at: Utc::now(),
        }
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PhasePlan::default())
    }
}
