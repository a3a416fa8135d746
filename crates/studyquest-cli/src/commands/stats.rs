use clap::Subcommand;
use serde_json::json;

use crate::store::{print_json, CliResult, Store};

#[derive(Subcommand)]
pub enum StatsAction {
    /// All-time stats from the session archive
    All,
    /// Study time and XP aggregates
    Study,
}

pub fn run(action: StatsAction) -> CliResult {
    let store = Store::open()?;

    match action {
        StatsAction::All => {
            let stats = store.db().stats_all()?;
            print_json(&stats)?;
        }
        StatsAction::Study => {
            let engine = store.load_engine()?;
            let tracker = engine.tracker();
            print_json(&json!({
                "total_study_minutes": tracker.total_study_minutes(),
                "weekly_study_minutes": tracker.weekly_study_minutes(),
                "completed_pomodoros": engine.timer().completed_sessions(),
                "xp": engine.ledger().summary(),
            }))?;
        }
    }
    Ok(())
}
