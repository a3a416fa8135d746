use clap::Subcommand;
use serde_json::json;
use studyquest_core::Achievement;

use crate::store::{print_json, CliResult, Store};

#[derive(Subcommand)]
pub enum AchievementAction {
    /// List achievements
    List,
    /// Unlock an achievement (no-op if already unlocked)
    Unlock { id: String },
}

fn achievement_json(a: &Achievement) -> serde_json::Value {
    json!({
        "id": a.id,
        "title": a.title,
        "description": a.description,
        "icon": a.icon,
        "category": a.category,
        "is_unlocked": a.is_unlocked(),
        "unlocked_at": a.unlocked_at(),
    })
}

pub fn run(action: AchievementAction) -> CliResult {
    let store = Store::open()?;
    let mut engine = store.load_engine()?;

    match action {
        AchievementAction::List => {
            let achievements: Vec<_> = engine
                .ledger()
                .achievements()
                .iter()
                .map(achievement_json)
                .collect();
            print_json(&achievements)?;
        }
        AchievementAction::Unlock { id } => match engine.ledger_mut().unlock_achievement(&id)? {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.ledger().achievement(&id).map(achievement_json))?,
        },
    }

    store.save_engine(&engine)?;
    Ok(())
}
