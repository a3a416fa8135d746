//! Study session lifecycle tracking.
//!
//! At most one [`StudySession`] is open at a time. Closing it stamps the end
//! time, computes whole focus minutes from wall-clock time, and moves it to
//! the front of a bounded history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::EngineError;
use crate::events::Event;

/// Closed sessions kept in history, newest first.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub xp_earned: u32,
    pub lessons_completed: u32,
    pub quizzes_completed: u32,
    pub total_focus_minutes: u64,
}

impl StudySession {
    fn open(subject_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            start_time: at,
            end_time: None,
            xp_earned: 0,
            lessons_completed: 0,
            quizzes_completed: 0,
            total_focus_minutes: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Whole minutes between start and `now`; 0 if the clock went backwards.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> u64 {
        let minutes = (now - self.start_time).num_minutes();
        u64::try_from(minutes).unwrap_or(0)
    }

    pub fn ended_event(&self) -> Event {
        Event::SessionEnded {
            session_id: self.id.clone(),
            subject_id: self.subject_id.clone(),
            total_focus_minutes: self.total_focus_minutes,
            xp_earned: self.xp_earned,
            lessons_completed: self.lessons_completed,
            quizzes_completed: self.quizzes_completed,
            at: self.end_time.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionTracker {
    current: Option<StudySession>,
    history: VecDeque<StudySession>,
    /// Minutes across all closed sessions.
    total_study_minutes: u64,
    weekly_study_minutes: u64,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&StudySession> {
        self.current.as_ref()
    }

    /// Closed sessions, newest first.
    pub fn history(&self) -> impl Iterator<Item = &StudySession> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn total_study_minutes(&self) -> u64 {
        self.total_study_minutes
    }

    pub fn weekly_study_minutes(&self) -> u64 {
        self.weekly_study_minutes
    }

    pub fn start_session(&mut self, subject_id: &str) -> Result<Event, EngineError> {
        self.start_session_at(subject_id, Utc::now())
    }

    pub fn start_session_at(
        &mut self,
        subject_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Event, EngineError> {
        if let Some(open) = &self.current {
            return Err(EngineError::AlreadyOpenSession {
                id: open.id.clone(),
            });
        }
        let session = StudySession::open(subject_id, at);
        tracing::debug!(session_id = %session.id, subject_id, "study session started");
        let event = Event::SessionStarted {
            session_id: session.id.clone(),
            subject_id: session.subject_id.clone(),
            at,
        };
        self.current = Some(session);
        Ok(event)
    }

    pub fn end_session(&mut self) -> Result<StudySession, EngineError> {
        self.end_session_at(Utc::now())
    }

    /// Close the open session and return the closed record.
    pub fn end_session_at(&mut self, now: DateTime<Utc>) -> Result<StudySession, EngineError> {
        let mut session = self.current.take().ok_or(EngineError::NoActiveSession)?;
        session.total_focus_minutes = session.elapsed_minutes(now);
        session.end_time = Some(now);

        self.total_study_minutes = self
            .total_study_minutes
            .saturating_add(session.total_focus_minutes);
        self.weekly_study_minutes = self
            .weekly_study_minutes
            .saturating_add(session.total_focus_minutes);

        self.history.push_front(session.clone());
        self.history.truncate(HISTORY_LIMIT);

        tracing::info!(
            session_id = %session.id,
            minutes = session.total_focus_minutes,
            xp = session.xp_earned,
            "study session ended"
        );
        Ok(session)
    }

    pub fn add_xp_to_session(&mut self, amount: u32) -> Result<u32, EngineError> {
        let session = self.open_mut()?;
        session.xp_earned = session.xp_earned.saturating_add(amount);
        Ok(session.xp_earned)
    }

    pub fn increment_lessons(&mut self) -> Result<u32, EngineError> {
        let session = self.open_mut()?;
        session.lessons_completed = session.lessons_completed.saturating_add(1);
        Ok(session.lessons_completed)
    }

    pub fn increment_quizzes(&mut self) -> Result<u32, EngineError> {
        let session = self.open_mut()?;
        session.quizzes_completed = session.quizzes_completed.saturating_add(1);
        Ok(session.quizzes_completed)
    }

    /// Credit XP to a closed session already in history.
    ///
    /// Used for the completion reward, which is decided after the session closes.
    pub(crate) fn credit_closed(&mut self, session_id: &str, amount: u32) {
        if let Some(session) = self.history.iter_mut().find(|s| s.id == session_id) {
            session.xp_earned = session.xp_earned.saturating_add(amount);
        }
    }

    /// Start a new weekly accounting window.
    pub fn reset_weekly(&mut self) {
        self.weekly_study_minutes = 0;
    }

    fn open_mut(&mut self) -> Result<&mut StudySession, EngineError> {
        self.current.as_mut().ok_or(EngineError::NoActiveSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn start_and_end_session() {
        let mut tracker = SessionTracker::new();
        tracker.start_session_at("math", base()).unwrap();
        assert!(tracker.current().unwrap().is_open());

        let closed = tracker
            .end_session_at(base() + Duration::seconds(25 * 60 + 59))
            .unwrap();
        assert_eq!(closed.total_focus_minutes, 25);
        assert_eq!(closed.end_time, Some(base() + Duration::seconds(25 * 60 + 59)));
        assert!(tracker.current().is_none());
        assert_eq!(tracker.history_len(), 1);
        assert_eq!(tracker.total_study_minutes(), 25);
        assert_eq!(tracker.weekly_study_minutes(), 25);
    }

    #[test]
    fn second_start_is_rejected() {
        let mut tracker = SessionTracker::new();
        tracker.start_session_at("math", base()).unwrap();
        let id = tracker.current().unwrap().id.clone();
        let err = tracker.start_session_at("physics", base()).unwrap_err();
        assert_eq!(err, EngineError::AlreadyOpenSession { id: id.clone() });
        assert_eq!(tracker.current().unwrap().subject_id, "math");
        assert_eq!(tracker.current().unwrap().id, id);
    }

    #[test]
    fn end_without_session_is_reported() {
        let mut tracker = SessionTracker::new();
        assert_eq!(tracker.end_session(), Err(EngineError::NoActiveSession));
        assert_eq!(tracker.history_len(), 0);
        assert_eq!(tracker.total_study_minutes(), 0);
    }

    #[test]
    fn counters_require_open_session() {
        let mut tracker = SessionTracker::new();
        assert_eq!(tracker.add_xp_to_session(10), Err(EngineError::NoActiveSession));
        assert_eq!(tracker.increment_lessons(), Err(EngineError::NoActiveSession));
        assert_eq!(tracker.increment_quizzes(), Err(EngineError::NoActiveSession));

        tracker.start_session_at("math", base()).unwrap();
        assert_eq!(tracker.add_xp_to_session(10), Ok(10));
        assert_eq!(tracker.add_xp_to_session(5), Ok(15));
        assert_eq!(tracker.increment_lessons(), Ok(1));
        assert_eq!(tracker.increment_quizzes(), Ok(1));
        assert_eq!(tracker.increment_quizzes(), Ok(2));

        let closed = tracker.end_session_at(base()).unwrap();
        assert_eq!(closed.xp_earned, 15);
        assert_eq!(closed.lessons_completed, 1);
        assert_eq!(closed.quizzes_completed, 2);
    }

    #[test]
    fn history_keeps_ten_newest() {
        let mut tracker = SessionTracker::new();
        for i in 0..12 {
            let at = base() + Duration::hours(i);
            tracker.start_session_at(&format!("s{i}"), at).unwrap();
            tracker.end_session_at(at + Duration::minutes(1)).unwrap();
        }
        assert_eq!(tracker.history_len(), HISTORY_LIMIT);
        let subjects: Vec<_> = tracker.history().map(|s| s.subject_id.as_str()).collect();
        assert_eq!(subjects.first(), Some(&"s11"));
        assert_eq!(subjects.last(), Some(&"s2"));
        assert_eq!(tracker.total_study_minutes(), 12);
    }

    #[test]
    fn clock_going_backwards_counts_zero_minutes() {
        let mut tracker = SessionTracker::new();
        tracker.start_session_at("math", base()).unwrap();
        let closed = tracker.end_session_at(base() - Duration::minutes(5)).unwrap();
        assert_eq!(closed.total_focus_minutes, 0);
    }

    #[test]
    fn reset_weekly_keeps_total() {
        let mut tracker = SessionTracker::new();
        tracker.start_session_at("math", base()).unwrap();
        tracker.end_session_at(base() + Duration::minutes(30)).unwrap();
        tracker.reset_weekly();
        assert_eq!(tracker.weekly_study_minutes(), 0);
        assert_eq!(tracker.total_study_minutes(), 30);
    }
}
