use clap::Subcommand;
use serde_json::json;
use studyquest_core::Config;

use crate::store::{print_json, CliResult, Store};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting (e.g. "study.pomodoro_length", "rewards.policy")
    Get { key: String },
    /// Change one setting; the timer picks it up at its next transition
    Set { key: String, value: String },
    /// Print every setting as JSON
    List,
    /// Restore the default settings
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let store = Store::open()?;
            let value = store
                .config()
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut store = Store::open()?;
            store.config_mut().set(&key, &value)?;
            store.save_config()?;
            print_json(&json!({ "key": key, "value": store.config().get(&key) }))
        }
        ConfigAction::List => print_json(Store::open()?.config()),
        // Skips loading so an unreadable file can still be reset.
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            print_json(&config)
        }
    }
}
