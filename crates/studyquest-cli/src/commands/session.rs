use clap::Subcommand;
use serde_json::json;

use crate::store::{print_json, CliResult, Store};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Open a study session
    Start {
        /// Subject ID
        subject: String,
    },
    /// Close the open session (no completion reward; see `timer stop`)
    End,
    /// Credit XP to the open session
    AddXp { amount: u32 },
    /// Count a completed lesson in the open session
    Lesson,
    /// Count a completed quiz in the open session
    Quiz,
    /// Print the open session and study time aggregates
    Status,
    /// Recent closed sessions
    History {
        /// Read the full archive instead of the in-memory history
        #[arg(long)]
        archive: bool,
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

pub fn run(action: SessionAction) -> CliResult {
    let store = Store::open()?;
    let mut engine = store.load_engine()?;

    match action {
        SessionAction::Start { subject } => {
            let event = engine.tracker_mut().start_session(&subject)?;
            print_json(&event)?;
        }
        SessionAction::End => {
            let closed = engine.tracker_mut().end_session()?;
            store.db().record_session(&closed)?;
            print_json(&closed.ended_event())?;
        }
        SessionAction::AddXp { amount } => {
            let total = engine.tracker_mut().add_xp_to_session(amount)?;
            print_json(&json!({ "xp_earned": total }))?;
        }
        SessionAction::Lesson => {
            let count = engine.tracker_mut().increment_lessons()?;
            print_json(&json!({ "lessons_completed": count }))?;
        }
        SessionAction::Quiz => {
            let count = engine.tracker_mut().increment_quizzes()?;
            print_json(&json!({ "quizzes_completed": count }))?;
        }
        SessionAction::Status => {
            let tracker = engine.tracker();
            print_json(&json!({
                "current": tracker.current(),
                "total_study_minutes": tracker.total_study_minutes(),
                "weekly_study_minutes": tracker.weekly_study_minutes(),
            }))?;
        }
        SessionAction::History { archive, limit } => {
            if archive {
                print_json(&store.db().recent_sessions(limit)?)?;
            } else {
                let recent: Vec<_> = engine.tracker().history().take(limit).collect();
                print_json(&recent)?;
            }
        }
    }

    store.save_engine(&engine)?;
    Ok(())
}
