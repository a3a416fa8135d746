use clap::{Subcommand, ValueEnum};

use crate::store::{print_json, CliResult, Store};

#[derive(Clone, Copy, ValueEnum)]
pub enum Window {
    Daily,
    Weekly,
}

#[derive(Subcommand)]
pub enum XpAction {
    /// Credit XP to the ledger
    Add {
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// XP totals, level and streak
    Status,
    /// Start a new accounting window
    Reset {
        #[arg(value_enum)]
        window: Window,
    },
}

pub fn run(action: XpAction) -> CliResult {
    let store = Store::open()?;
    let mut engine = store.load_engine()?;

    match action {
        XpAction::Add { amount } => {
            let amount = u32::try_from(amount)
                .map_err(|_| format!("XP amount must be between 0 and {}, got {amount}", u32::MAX))?;
            print_json(&engine.ledger_mut().add_xp(amount))?;
        }
        XpAction::Status => {
            print_json(&engine.ledger().summary())?;
        }
        XpAction::Reset { window } => {
            match window {
                Window::Daily => engine.ledger_mut().reset_daily(),
                Window::Weekly => {
                    engine.ledger_mut().reset_weekly();
                    engine.tracker_mut().reset_weekly();
                }
            }
            print_json(&engine.ledger().summary())?;
        }
    }

    store.save_engine(&engine)?;
    Ok(())
}
