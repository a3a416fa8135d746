//! Study engine: the timer, session tracker and ledger wired together.
//!
//! Each component stays the single writer of its own state and can be
//! driven directly through the accessors. The engine adds the two
//! workflows that span components:
//!
//! - `start_focus`: open a study session if none is open, then start a
//!   focus block.
//! - `stop`: stop the timer and, if a session is open, close it and pay the
//!   completion reward chosen by the injected [`RewardPolicy`] into both the
//!   session record and the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::events::Event;
use crate::ledger::XpLedger;
use crate::reward::RewardPolicy;
use crate::session::{SessionTracker, StudySession};
use crate::timer::{PhasePlan, PomodoroTimer};

/// Serializable engine state for snapshot/restore.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub timer: PomodoroTimer,
    pub tracker: SessionTracker,
    pub ledger: XpLedger,
}

/// Result of [`StudyEngine::stop`].
#[derive(Debug, Clone)]
pub struct StopOutcome {
    pub events: Vec<Event>,
    /// The session closed by this stop, reward included.
    pub closed_session: Option<StudySession>,
    pub reward_xp: Option<u32>,
}

pub struct StudyEngine {
    timer: PomodoroTimer,
    tracker: SessionTracker,
    ledger: XpLedger,
    rewards: Box<dyn RewardPolicy + Send>,
}

impl StudyEngine {
    /// Fresh engine with the built-in quest catalog.
    pub fn new(plan: PhasePlan, rewards: Box<dyn RewardPolicy + Send>) -> Self {
        Self {
            timer: PomodoroTimer::new(plan),
            tracker: SessionTracker::new(),
            ledger: XpLedger::with_catalog(),
            rewards,
        }
    }

    pub fn from_snapshot(snapshot: EngineSnapshot, rewards: Box<dyn RewardPolicy + Send>) -> Self {
        Self {
            timer: snapshot.timer,
            tracker: snapshot.tracker,
            ledger: snapshot.ledger,
            rewards,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            timer: self.timer.clone(),
            tracker: self.tracker.clone(),
            ledger: self.ledger.clone(),
        }
    }

    // ── Components ───────────────────────────────────────────────────

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut PomodoroTimer {
        &mut self.timer
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut SessionTracker {
        &mut self.tracker
    }

    pub fn ledger(&self) -> &XpLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut XpLedger {
        &mut self.ledger
    }

    // ── Workflows ────────────────────────────────────────────────────

    /// Ensure a session is open for `subject_id` and start a focus block.
    ///
    /// An invalid duration is rejected before any session is opened. If a
    /// session is already open it is kept, whatever its subject.
    pub fn start_focus(&mut self, subject_id: &str, minutes: u64) -> Result<Vec<Event>, EngineError> {
        if minutes == 0 {
            return Err(EngineError::InvalidDuration { minutes });
        }
        let mut events = Vec::new();
        if self.tracker.current().is_none() {
            events.push(self.tracker.start_session(subject_id)?);
        }
        events.extend(self.timer.start(minutes)?);
        Ok(events)
    }

    pub fn stop(&mut self) -> StopOutcome {
        self.stop_at(Utc::now())
    }

    /// Stop the timer and close the open session, if any, at `now`.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> StopOutcome {
        let mut events = vec![self.timer.stop()];
        let Ok(mut closed) = self.tracker.end_session_at(now) else {
            return StopOutcome {
                events,
                closed_session: None,
                reward_xp: None,
            };
        };

        let reward = self.rewards.reward_for(&closed);
        self.tracker.credit_closed(&closed.id, reward);
        closed.xp_earned = closed.xp_earned.saturating_add(reward);

        events.push(closed.ended_event());
        events.push(self.ledger.add_xp(reward));
        events.extend(self.ledger.record_study_day(now.date_naive()));

        StopOutcome {
            events,
            closed_session: Some(closed),
            reward_xp: Some(reward),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::FixedReward;
    use chrono::Duration;

    fn engine() -> StudyEngine {
        StudyEngine::new(PhasePlan::default(), Box::new(FixedReward(40)))
    }

    #[test]
    fn start_focus_opens_session_once() {
        let mut e = engine();
        let events = e.start_focus("math", 25).unwrap();
        assert_eq!(events.len(), 2);
        e.timer_mut().pause();
        let events = e.start_focus("physics", 25).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(e.tracker().current().unwrap().subject_id, "math");
    }

    #[test]
    fn invalid_duration_opens_nothing() {
        let mut e = engine();
        assert!(e.start_focus("math", 0).is_err());
        assert!(e.tracker().current().is_none());
        assert!(!e.timer().is_active());
    }

    #[test]
    fn stop_pays_reward_once() {
        let mut e = engine();
        e.start_focus("math", 25).unwrap();
        let started = e.tracker().current().unwrap().start_time;
        e.tracker_mut().add_xp_to_session(10).unwrap();

        let outcome = e.stop_at(started + Duration::minutes(30));
        assert_eq!(outcome.reward_xp, Some(40));
        let closed = outcome.closed_session.unwrap();
        assert_eq!(closed.xp_earned, 50);
        assert_eq!(closed.total_focus_minutes, 30);
        assert_eq!(e.tracker().history().next().unwrap().xp_earned, 50);
        assert_eq!(e.ledger().today_xp(), 40);
        assert_eq!(e.ledger().study_streak(), 1);
        assert!(!e.timer().is_active());

        let again = e.stop();
        assert!(again.closed_session.is_none());
        assert_eq!(again.events.len(), 1);
        assert_eq!(e.ledger().today_xp(), 40);
    }

    #[test]
    fn snapshot_restores_state() {
        let mut e = engine();
        e.start_focus("math", 25).unwrap();
        for _ in 0..30 {
            e.timer_mut().tick();
        }
        e.ledger_mut().update_quest_progress("math-wizard", 10).unwrap();

        let json = serde_json::to_string(&e.snapshot()).unwrap();
        let restored: EngineSnapshot = serde_json::from_str(&json).unwrap();
        let r = StudyEngine::from_snapshot(restored, Box::new(FixedReward(0)));

        assert_eq!(r.timer().remaining_secs(), 1470);
        assert!(r.timer().is_active());
        assert!(r.tracker().current().is_some());
        assert!(r.ledger().quest("math-wizard").unwrap().is_claimable());
    }
}
