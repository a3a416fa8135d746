mod achievement;
mod catalog;
mod level;
mod quest;
mod xp;

pub use achievement::Achievement;
pub use catalog::{default_achievements, default_quests};
pub use level::{level_for_xp, next_level_threshold};
pub use quest::{Quest, QuestKind, QuestStatus};
pub use xp::{XpLedger, XpSummary};
