use clap::Subcommand;
use studyquest_core::{ClockDriver, StopOutcome};

use crate::store::{print_json, CliResult, Store};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a fresh focus block (opens a study session if none is open)
    Start {
        /// Focus length in minutes (defaults to study.pomodoro_length)
        #[arg(long)]
        minutes: Option<u64>,
        /// Subject for the study session (defaults to default_subject)
        #[arg(long)]
        subject: Option<String>,
    },
    /// Continue the current phase where it stopped
    Resume,
    /// Pause the countdown
    Pause,
    /// Stop the timer, close the open session and award its XP
    Stop,
    /// Advance the countdown by whole seconds
    Tick {
        #[arg(long, default_value = "1")]
        count: u64,
    },
    /// Run the countdown in real time until the phase ends (Ctrl-C pauses)
    Run,
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> CliResult {
    let store = Store::open()?;
    let mut engine = store.load_engine()?;

    match action {
        TimerAction::Start { minutes, subject } => {
            let minutes = minutes.unwrap_or(store.config().study.pomodoro_length);
            let subject = subject.unwrap_or_else(|| store.config().default_subject.clone());
            let events = engine.start_focus(&subject, minutes)?;
            if events.is_empty() {
                print_json(&engine.timer().snapshot())?;
            }
            for event in &events {
                print_json(event)?;
            }
        }
        TimerAction::Resume => match engine.timer_mut().resume() {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.timer().snapshot())?,
        },
        TimerAction::Pause => match engine.timer_mut().pause() {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.timer().snapshot())?,
        },
        TimerAction::Stop => {
            let StopOutcome {
                events,
                closed_session,
                ..
            } = engine.stop();
            if let Some(session) = &closed_session {
                store.db().record_session(session)?;
            }
            for event in &events {
                print_json(event)?;
            }
        }
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if let Some(event) = engine.timer_mut().tick() {
                    print_json(&event)?;
                }
            }
            print_json(&engine.timer().snapshot())?;
        }
        TimerAction::Run => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let interrupted = runtime.block_on(async {
                let mut clock = ClockDriver::default();
                let run = clock.run(engine.timer_mut(), |_, event| {
                    if let Ok(json) = serde_json::to_string_pretty(&event) {
                        println!("{json}");
                    }
                });
                tokio::select! {
                    _ = run => false,
                    Ok(()) = tokio::signal::ctrl_c() => true,
                }
            });
            // The clock is gone; freeze the countdown where it stopped.
            if interrupted {
                tracing::info!("timer run interrupted");
                if let Some(event) = engine.timer_mut().pause() {
                    print_json(&event)?;
                }
            }
            print_json(&engine.timer().snapshot())?;
        }
        TimerAction::Status => {
            print_json(&engine.timer().snapshot())?;
        }
    }

    store.save_engine(&engine)?;
    Ok(())
}
