//! Quest, achievement and XP bookkeeping.
//!
//! The ledger is the single writer for quest state, achievement unlocks,
//! the XP aggregates and the study streak. Every mutation goes through one
//! of the methods below; unknown ids and illegal transitions are returned
//! as [`EngineError`]s with the ledger left unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::achievement::Achievement;
use super::catalog;
use super::level::{level_for_xp, next_level_threshold};
use super::quest::{Quest, QuestKind};
use crate::error::EngineError;
use crate::events::Event;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XpLedger {
    quests: Vec<Quest>,
    achievements: Vec<Achievement>,
    today_xp: u64,
    weekly_xp: u64,
    total_xp: u64,
    study_streak: u32,
    #[serde(default)]
    last_study_day: Option<NaiveDate>,
}

/// Read-only view of the XP aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpSummary {
    pub today_xp: u64,
    pub weekly_xp: u64,
    pub total_xp: u64,
    pub level: u32,
    pub next_level_xp: u64,
    pub study_streak: u32,
}

impl XpLedger {
    pub fn new(quests: Vec<Quest>, achievements: Vec<Achievement>) -> Self {
        Self {
            quests,
            achievements,
            ..Self::default()
        }
    }

    /// Ledger seeded with the built-in quests and achievements.
    pub fn with_catalog() -> Self {
        Self::new(catalog::default_quests(), catalog::default_achievements())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn quests_of(&self, kind: QuestKind) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(move |q| q.kind == kind)
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn today_xp(&self) -> u64 {
        self.today_xp
    }

    pub fn weekly_xp(&self) -> u64 {
        self.weekly_xp
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    pub fn study_streak(&self) -> u32 {
        self.study_streak
    }

    pub fn summary(&self) -> XpSummary {
        let level = level_for_xp(self.total_xp);
        XpSummary {
            today_xp: self.today_xp,
            weekly_xp: self.weekly_xp,
            total_xp: self.total_xp,
            level,
            next_level_xp: next_level_threshold(level),
            study_streak: self.study_streak,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Credit `amount` to the daily, weekly and total counters.
    pub fn add_xp(&mut self, amount: u32) -> Event {
        let amount_u64 = u64::from(amount);
        self.today_xp = self.today_xp.saturating_add(amount_u64);
        self.weekly_xp = self.weekly_xp.saturating_add(amount_u64);
        self.total_xp = self.total_xp.saturating_add(amount_u64);
        tracing::debug!(amount, today_xp = self.today_xp, "xp credited");
        Event::XpAwarded {
            amount,
            today_xp: self.today_xp,
            weekly_xp: self.weekly_xp,
            total_xp: self.total_xp,
            at: Utc::now(),
        }
    }

    /// Set quest progress (clamped). Reaching the goal completes it once.
    pub fn update_quest_progress(&mut self, id: &str, progress: u32) -> Result<Event, EngineError> {
        let quest = self.quest_mut(id)?;
        let completed_now = quest.set_progress(progress);
        Ok(Self::quest_event(quest, completed_now))
    }

    /// Force a quest to completion. `None` if it was already complete.
    pub fn complete_quest(&mut self, id: &str) -> Result<Option<Event>, EngineError> {
        let quest = self.quest_mut(id)?;
        if !quest.complete() {
            return Ok(None);
        }
        Ok(Some(Self::quest_event(quest, true)))
    }

    /// Collect a completed quest's reward exactly once.
    pub fn claim_quest_reward(&mut self, id: &str) -> Result<Event, EngineError> {
        let quest = self.quest_mut(id)?;
        let reward_xp = quest.claim().ok_or_else(|| EngineError::QuestNotClaimable {
            id: id.to_string(),
        })?;
        self.add_xp(reward_xp);
        tracing::info!(quest_id = id, reward_xp, "quest reward claimed");
        Ok(Event::QuestClaimed {
            quest_id: id.to_string(),
            reward_xp,
            today_xp: self.today_xp,
            at: Utc::now(),
        })
    }

    pub fn unlock_achievement(&mut self, id: &str) -> Result<Option<Event>, EngineError> {
        self.unlock_achievement_at(id, Utc::now())
    }

    /// Unlock an achievement. `None` if it was already unlocked.
    pub fn unlock_achievement_at(
        &mut self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Event>, EngineError> {
        let achievement = self
            .achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| EngineError::AchievementNotFound(id.to_string()))?;
        if !achievement.unlock(at) {
            return Ok(None);
        }
        tracing::info!(achievement_id = id, "achievement unlocked");
        Ok(Some(Event::AchievementUnlocked {
            achievement_id: id.to_string(),
            title: achievement.title.clone(),
            at,
        }))
    }

    /// Count `day` toward the streak. `None` if it was already counted.
    pub fn record_study_day(&mut self, day: NaiveDate) -> Option<Event> {
        match self.last_study_day {
            Some(last) if last >= day => return None,
            Some(last) if last.succ_opt() == Some(day) => {
                self.study_streak = self.study_streak.saturating_add(1);
            }
            _ => self.study_streak = 1,
        }
        self.last_study_day = Some(day);
        tracing::debug!(streak = self.study_streak, %day, "study streak updated");
        Some(Event::StreakUpdated {
            streak_days: self.study_streak,
            at: Utc::now(),
        })
    }

    /// Start a new day: clears today's XP and daily quest progress.
    pub fn reset_daily(&mut self) {
        self.today_xp = 0;
        self.reset_quests(QuestKind::Daily);
    }

    /// Start a new week: clears weekly XP and weekly quest progress.
    pub fn reset_weekly(&mut self) {
        self.weekly_xp = 0;
        self.reset_quests(QuestKind::Weekly);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn quest_mut(&mut self, id: &str) -> Result<&mut Quest, EngineError> {
        self.quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| EngineError::QuestNotFound(id.to_string()))
    }

    fn quest_event(quest: &Quest, completed_now: bool) -> Event {
        if completed_now {
            tracing::info!(quest_id = %quest.id, "quest completed");
            Event::QuestCompleted {
                quest_id: quest.id.clone(),
                reward_xp: quest.reward_xp,
                progress: quest.progress(),
                max_progress: quest.max_progress(),
                status: quest.status(),
                at: Utc::now(),
            }
        } else {
            Event::QuestProgressed {
                quest_id: quest.id.clone(),
                progress: quest.progress(),
                max_progress: quest.max_progress(),
                status: quest.status(),
                at: Utc::now(),
            }
        }
    }

    fn reset_quests(&mut self, kind: QuestKind) {
        for quest in self.quests.iter_mut().filter(|q| q.kind == kind) {
            *quest = Quest::new(
                quest.id.clone(),
                quest.title.clone(),
                quest.description.clone(),
                quest.reward_xp,
                quest.kind,
                quest.max_progress(),
            );
        }
    }
}
