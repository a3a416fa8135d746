use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    #[serde(default)]
    unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            category: category.into(),
            unlocked_at: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        self.unlocked_at
    }

    /// Unlock at `at`. Returns `false` if it was already unlocked.
    pub fn unlock(&mut self, at: DateTime<Utc>) -> bool {
        if self.unlocked_at.is_some() {
            return false;
        }
        self.unlocked_at = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_keeps_first_timestamp() {
        let mut a = Achievement::new("1", "First Steps", "", "👶", "beginner");
        let first = Utc::now();
        assert!(a.unlock(first));
        assert!(!a.unlock(first + chrono::Duration::days(1)));
        assert_eq!(a.unlocked_at(), Some(first));
    }
}
