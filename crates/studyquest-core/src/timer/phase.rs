use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn is_break(self) -> bool {
        self == Phase::Break
    }

    pub fn from_is_break(is_break: bool) -> Self {
        if is_break {
            Phase::Break
        } else {
            Phase::Focus
        }
    }
}

/// Phase lengths and auto-start behaviour applied at each expiry.
///
/// Built from the `[study]` settings. Changing the plan only affects the
/// next transition, never a countdown already in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePlan {
    /// Focus length in minutes.
    pub focus_min: u64,
    pub short_break_min: u64,
    pub long_break_min: u64,
    /// Every n-th finished focus block is followed by a long break. 0 disables long breaks.
    #[serde(default)]
    pub long_break_interval: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_focus: bool,
}

impl PhasePlan {
    /// Create a plan, rejecting zero-length phases.
    pub fn new(
        focus_min: u64,
        short_break_min: u64,
        long_break_min: u64,
        long_break_interval: u32,
    ) -> Result<Self, EngineError> {
        for minutes in [focus_min, short_break_min, long_break_min] {
            if minutes == 0 {
                return Err(EngineError::InvalidDuration { minutes });
            }
        }
        Ok(Self {
            focus_min,
            short_break_min,
            long_break_min,
            long_break_interval,
            auto_start_breaks: false,
            auto_start_focus: false,
        })
    }

    pub fn with_auto_start(mut self, breaks: bool, focus: bool) -> Self {
        self.auto_start_breaks = breaks;
        self.auto_start_focus = focus;
        self
    }

    /// Break length in minutes following the `focus_block`-th finished focus block (1-based).
    pub fn break_after(&self, focus_block: u32) -> u64 {
        if self.long_break_interval > 0 && focus_block % self.long_break_interval == 0 {
            self.long_break_min
        } else {
            self.short_break_min
        }
    }

    pub fn auto_start(&self, phase: Phase) -> bool {
        match phase {
            Phase::Focus => self.auto_start_focus,
            Phase::Break => self.auto_start_breaks,
        }
    }
}

impl Default for PhasePlan {
    fn default() -> Self {
        Self {
            focus_min: 25,
            short_break_min: 5,
            long_break_min: 15,
            long_break_interval: 4,
            auto_start_breaks: false,
            auto_start_focus: false,
        }
    }
}

/// Minutes to seconds, saturating on overflow.
pub fn minutes_to_secs(minutes: u64) -> u64 {
    minutes.saturating_mul(60)
}
