use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Daily,
    Weekly,
}

/// Quest lifecycle.
///
/// ```text
/// Locked -> InProgress -> Completed -> Claimed
///       \______________/^
/// ```
///
/// Completion and claim are one-way: lowering progress never leaves
/// `Completed` or `Claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// No progress yet.
    Locked,
    InProgress,
    /// Goal reached, reward not yet collected.
    Completed,
    Claimed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub kind: QuestKind,
    progress: u32,
    max_progress: u32,
    status: QuestStatus,
}

impl Quest {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        reward_xp: u32,
        kind: QuestKind,
        max_progress: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            reward_xp,
            kind,
            progress: 0,
            max_progress,
            status: QuestStatus::Locked,
        }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn max_progress(&self) -> u32 {
        self.max_progress
    }

    pub fn status(&self) -> QuestStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, QuestStatus::Completed | QuestStatus::Claimed)
    }

    pub fn is_claimable(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    /// Set progress, clamped to `max_progress`.
    ///
    /// Returns `true` if this call completed the quest.
    pub fn set_progress(&mut self, progress: u32) -> bool {
        self.progress = progress.min(self.max_progress);
        match self.status {
            QuestStatus::Completed | QuestStatus::Claimed => false,
            _ if self.progress == self.max_progress => {
                self.status = QuestStatus::Completed;
                true
            }
            _ if self.progress > 0 => {
                self.status = QuestStatus::InProgress;
                false
            }
            _ => {
                self.status = QuestStatus::Locked;
                false
            }
        }
    }

    /// Jump straight to completion. Returns `true` on the transition.
    pub fn complete(&mut self) -> bool {
        self.set_progress(self.max_progress)
    }

    /// Move `Completed` to `Claimed`, returning the reward. `None` otherwise.
    pub fn claim(&mut self) -> Option<u32> {
        if self.status != QuestStatus::Completed {
            return None;
        }
        self.status = QuestStatus::Claimed;
        Some(self.reward_xp)
    }
}
