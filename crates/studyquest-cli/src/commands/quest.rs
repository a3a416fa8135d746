use clap::{Subcommand, ValueEnum};
use serde_json::json;
use studyquest_core::{Quest, QuestKind};

use crate::store::{print_json, CliResult, Store};

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Daily,
    Weekly,
}

impl From<KindArg> for QuestKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Daily => QuestKind::Daily,
            KindArg::Weekly => QuestKind::Weekly,
        }
    }
}

#[derive(Subcommand)]
pub enum QuestAction {
    /// List quests with their progress
    List {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Set a quest's progress (clamped to its goal)
    Progress {
        id: String,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Mark a quest complete
    Complete { id: String },
    /// Collect a completed quest's reward
    Claim { id: String },
}

fn quest_json(q: &Quest) -> serde_json::Value {
    json!({
        "id": q.id,
        "title": q.title,
        "description": q.description,
        "kind": q.kind,
        "reward_xp": q.reward_xp,
        "progress": q.progress(),
        "max_progress": q.max_progress(),
        "status": q.status(),
        "is_completed": q.is_completed(),
        "is_claimable": q.is_claimable(),
    })
}

pub fn run(action: QuestAction) -> CliResult {
    let store = Store::open()?;
    let mut engine = store.load_engine()?;

    match action {
        QuestAction::List { kind } => {
            let quests: Vec<_> = engine
                .ledger()
                .quests()
                .iter()
                .filter(|q| kind.map_or(true, |k| q.kind == QuestKind::from(k)))
                .map(quest_json)
                .collect();
            print_json(&quests)?;
        }
        QuestAction::Progress { id, value } => {
            let progress = u32::try_from(value.max(0)).unwrap_or(u32::MAX);
            let event = engine.ledger_mut().update_quest_progress(&id, progress)?;
            print_json(&event)?;
        }
        QuestAction::Complete { id } => match engine.ledger_mut().complete_quest(&id)? {
            Some(event) => print_json(&event)?,
            None => {
                let quest = engine.ledger().quest(&id).map(quest_json);
                print_json(&quest)?;
            }
        },
        QuestAction::Claim { id } => {
            let event = engine.ledger_mut().claim_quest_reward(&id)?;
            print_json(&event)?;
        }
    }

    store.save_engine(&engine)?;
    Ok(())
}
