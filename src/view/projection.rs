//! Clock and progress-ring projection of the timer state.

use crate::types::TimerState;

/// Derived display values for one timer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayProjection {
    /// Remaining time as `MM:SS`
    pub clock: ClockText,
    pub remaining_seconds: u32,
    pub full_seconds: u32,
    /// Fraction of the countdown left, in `[0, 1]`
    pub progress: f64,
}

/// Fixed-width `MM:SS` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockText {
    minutes: u32,
    seconds: u32,
}

impl std::fmt::Display for ClockText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl DisplayProjection {
    pub fn from_state(state: &TimerState) -> Self {
        let full_seconds = state.full_duration();
        let remaining_seconds = state.remaining_seconds.min(full_seconds);
        let progress = if full_seconds == 0 {
            0.0
        } else {
            f64::from(remaining_seconds) / f64::from(full_seconds)
        };

        Self {
            clock: ClockText {
                minutes: remaining_seconds / 60,
                seconds: remaining_seconds % 60,
            },
            remaining_seconds,
            full_seconds,
            progress,
        }
    }

    /// Dash offset of a ring with the given circumference.
    ///
    /// 0 draws the full ring, `circumference` draws none of it.
    pub fn stroke_offset(&self, circumference: f64) -> f64 {
        circumference - self.progress * circumference
    }
}

/// Formats seconds as `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
