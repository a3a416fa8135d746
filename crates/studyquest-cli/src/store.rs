//! Engine restore/save shared by the subcommands.
//!
//! Each invocation restores the engine snapshot from the kv table, applies
//! the current `[study]` settings, runs one command and writes it back.

use serde::Serialize;
use studyquest_core::{Config, Database, EngineSnapshot, StudyEngine};

const ENGINE_KEY: &str = "engine";

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct Store {
    db: Database,
    config: Config,
}

impl Store {
    pub fn open() -> CliResult<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        Ok(Self { db, config })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn save_config(&self) -> CliResult {
        self.config.save()?;
        Ok(())
    }

    pub fn load_engine(&self) -> CliResult<StudyEngine> {
        let rewards = self.config.rewards.build_policy();
        let mut engine = match self.db.kv_get(ENGINE_KEY)? {
            Some(json) => match serde_json::from_str::<EngineSnapshot>(&json) {
                Ok(snapshot) => StudyEngine::from_snapshot(snapshot, rewards),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable engine snapshot");
                    StudyEngine::new(self.config.study.phase_plan()?, rewards)
                }
            },
            None => StudyEngine::new(self.config.study.phase_plan()?, rewards),
        };
        engine.timer_mut().apply_plan(self.config.study.phase_plan()?);
        Ok(engine)
    }

    pub fn save_engine(&self, engine: &StudyEngine) -> CliResult {
        let json = serde_json::to_string(&engine.snapshot())?;
        self.db.kv_set(ENGINE_KEY, &json)?;
        Ok(())
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
