//! Periodic tick source for the pomodoro timer.
//!
//! At most one tick source is live per driver. Every tick carries the
//! generation it was armed with; `arm()` and `disarm()` bump the generation
//! and abort the previous task, so a tick already queued before a
//! cancellation is discarded instead of delivered.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::pomodoro::PomodoroTimer;
use crate::events::Event;

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

impl TickToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct ClockDriver {
    period: Duration,
    generation: u64,
    task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TickToken>,
    rx: mpsc::UnboundedReceiver<TickToken>,
}

impl ClockDriver {
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            period,
            generation: 0,
            task: None,
            tx,
            rx,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Install a fresh tick source, cancelling any previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self) {
        self.cancel();
        let tx = self.tx.clone();
        let period = self.period;
        let generation = self.generation;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(TickToken { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, "clock armed");
    }

    /// Cancel the tick source. Ticks already queued become stale.
    pub fn disarm(&mut self) {
        if self.task.is_some() {
            self.cancel();
            tracing::debug!(generation = self.generation, "clock disarmed");
        }
    }

    /// Arm or disarm to match whether the timer is running.
    pub fn sync_with(&mut self, timer: &PomodoroTimer) {
        match (timer.is_active(), self.is_armed()) {
            (true, false) => self.arm(),
            (false, true) => self.disarm(),
            _ => {}
        }
    }

    /// Wait for the next tick of the current generation.
    ///
    /// Returns `None` immediately when disarmed.
    pub async fn next_tick(&mut self) -> Option<TickToken> {
        if !self.is_armed() {
            return None;
        }
        loop {
            let token = self.rx.recv().await?;
            if token.generation == self.generation {
                return Some(token);
            }
        }
    }

    /// Drive `timer` until it stops running, forwarding every event it emits.
    ///
    /// Auto-started phases keep the clock armed; the loop ends once a phase
    /// finishes without auto-start (or the timer was never running).
    pub async fn run<F>(&mut self, timer: &mut PomodoroTimer, mut on_event: F)
    where
        F: FnMut(&PomodoroTimer, Event),
    {
        self.sync_with(timer);
        while self.next_tick().await.is_some() {
            if let Some(event) = timer.tick() {
                on_event(timer, event);
            }
            self.sync_with(timer);
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for ClockDriver {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
