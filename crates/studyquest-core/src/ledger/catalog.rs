//! Built-in quests and achievements for a fresh profile.

use super::achievement::Achievement;
use super::quest::{Quest, QuestKind};

pub fn default_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "daily-streak",
            "Daily Streak",
            "Complete 3 lessons today",
            50,
            QuestKind::Daily,
            3,
        ),
        Quest::new(
            "quiz-master",
            "Quiz Master",
            "Score 90% or higher on 5 quizzes",
            100,
            QuestKind::Weekly,
            5,
        ),
        Quest::new(
            "math-wizard",
            "Math Wizard",
            "Complete all algebra lessons",
            200,
            QuestKind::Weekly,
            10,
        ),
    ]
}

pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "first-steps",
            "First Steps",
            "Complete your first lesson",
            "👶",
            "beginner",
        ),
        Achievement::new(
            "week-warrior",
            "Week Warrior",
            "Maintain a 7-day streak",
            "⚔️",
            "streak",
        ),
        Achievement::new(
            "xp-hunter",
            "XP Hunter",
            "Earn 1000 XP in a single day",
            "🏆",
            "xp",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let quests: HashSet<_> = default_quests().into_iter().map(|q| q.id).collect();
        assert_eq!(quests.len(), 3);
        let achievements: HashSet<_> = default_achievements().into_iter().map(|a| a.id).collect();
        assert_eq!(achievements.len(), 3);
    }

    #[test]
    fn rewards_are_positive() {
        assert!(default_quests().iter().all(|q| q.reward_xp > 0));
    }
}
