//! Session completion rewards.
//!
//! How much XP a finished study session is worth is a policy decision kept
//! out of the tracker and the ledger. [`RandomReward`] reproduces the
//! classic 25-75 XP roll with an injectable seed; the other policies are
//! pure functions of the session.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::session::StudySession;

pub const DEFAULT_MIN_XP: u32 = 25;
pub const DEFAULT_MAX_XP: u32 = 75;

pub trait RewardPolicy {
    /// XP awarded for a closed session.
    fn reward_for(&mut self, session: &StudySession) -> u32;
}

/// Which [`RewardPolicy`] the `[rewards]` table selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    #[default]
    Random,
    FocusTime,
    /// Pays `max_xp` every session.
    Fixed,
}

/// Policy, bounds and seed for the session reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default)]
    pub policy: RewardKind,
    #[serde(default = "default_min_xp")]
    pub min_xp: u32,
    #[serde(default = "default_max_xp")]
    pub max_xp: u32,
    /// Random seed for reproducibility (None = random)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_xp() -> u32 {
    DEFAULT_MIN_XP
}
fn default_max_xp() -> u32 {
    DEFAULT_MAX_XP
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            policy: RewardKind::Random,
            min_xp: DEFAULT_MIN_XP,
            max_xp: DEFAULT_MAX_XP,
            seed: None,
        }
    }
}

impl RewardConfig {
    /// Build the configured policy.
    pub fn build_policy(&self) -> Box<dyn RewardPolicy + Send> {
        match self.policy {
            RewardKind::Random => Box::new(RandomReward::new(self)),
            RewardKind::FocusTime => Box::new(FocusTimeReward::new(self)),
            RewardKind::Fixed => Box::new(FixedReward(self.max_xp)),
        }
    }
}

/// Uniform draw from `min_xp..=max_xp`.
pub struct RandomReward {
    rng: Mcg128Xsl64,
    min_xp: u32,
    max_xp: u32,
}

impl RandomReward {
    pub fn new(config: &RewardConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            rng,
            min_xp: config.min_xp.min(config.max_xp),
            max_xp: config.max_xp.max(config.min_xp),
        }
    }
}

impl Default for RandomReward {
    fn default() -> Self {
        Self::new(&RewardConfig::default())
    }
}

impl RewardPolicy for RandomReward {
    fn reward_for(&mut self, _session: &StudySession) -> u32 {
        self.rng.gen_range(self.min_xp..=self.max_xp)
    }
}

/// Same amount for every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedReward(pub u32);

impl RewardPolicy for FixedReward {
    fn reward_for(&mut self, _session: &StudySession) -> u32 {
        self.0
    }
}

/// Deterministic reward from session content: 1 XP per focus minute,
/// 10 per lesson, 15 per quiz, clamped to the configured bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTimeReward {
    pub min_xp: u32,
    pub max_xp: u32,
}

impl FocusTimeReward {
    pub fn new(config: &RewardConfig) -> Self {
        Self {
            min_xp: config.min_xp.min(config.max_xp),
            max_xp: config.max_xp.max(config.min_xp),
        }
    }
}

impl RewardPolicy for FocusTimeReward {
    fn reward_for(&mut self, session: &StudySession) -> u32 {
        let raw = session
            .total_focus_minutes
            .saturating_add(u64::from(session.lessons_completed) * 10)
            .saturating_add(u64::from(session.quizzes_completed) * 15);
        let clamped = raw.clamp(u64::from(self.min_xp), u64::from(self.max_xp));
        u32::try_from(clamped).unwrap_or(self.max_xp)
    }
}
