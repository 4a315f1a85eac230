//! Countdown engine for the Pomodoro widget.
//!
//! This module provides the core timer functionality:
//! - Idle/Running transitions (start, pause, reset, mode selection)
//! - Countdown driven by a [`TickSource`]
//! - Completion handling with automatic mode cycling
//! - Event firing for the controller (chime, logging)

pub mod ticker;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::types::{DurationConfig, Mode, TimerState};

pub use ticker::{IntervalTicker, MockTickSource, Tick, TickSource};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started
    Started {
        /// Active mode
        mode: Mode,
        /// Seconds left when started
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Seconds left when paused
        remaining_seconds: u32,
    },
    /// Countdown refilled for the active mode
    Reset {
        /// Active mode
        mode: Mode,
    },
    /// A new mode was selected
    ModeSelected {
        /// Newly selected mode
        mode: Mode,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// The countdown reached zero
    Completed {
        /// Mode that finished
        mode: Mode,
        /// Completed focus sessions after this completion
        completed_focus_sessions: u32,
        /// Mode selected next
        next_mode: Mode,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine.
///
/// The engine owns the tick source and guarantees at most one recurring
/// tick is active at any time.
pub struct TimerEngine<T: TickSource> {
    /// Current timer state
    state: TimerState,
    /// Recurring tick driving the countdown
    ticker: T,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<T: TickSource> TimerEngine<T> {
    /// Creates an idle engine in focus mode.
    pub fn new(
        durations: DurationConfig,
        ticker: T,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(durations),
            ticker,
            event_tx,
        }
    }

    /// Starts the countdown.
    ///
    /// Returns false if the countdown was already running.
    pub fn start(&mut self) -> Result<bool> {
        if self.state.running || !self.ticker.start() {
            debug!("start ignored, countdown already running");
            return Ok(false);
        }
        self.state.running = true;

        self.emit(TimerEvent::Started {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        })?;
        Ok(true)
    }

    /// Pauses the countdown, keeping the remaining time.
    ///
    /// Returns false if the countdown was not running.
    pub fn pause(&mut self) -> Result<bool> {
        if !self.state.running {
            return Ok(false);
        }
        self.ticker.cancel();
        self.state.running = false;

        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        })?;
        Ok(true)
    }

    /// Starts the countdown if idle, pauses it otherwise.
    pub fn toggle(&mut self) -> Result<()> {
        if self.state.running {
            self.pause()?;
        } else {
            self.start()?;
        }
        Ok(())
    }

    /// Stops the countdown and refills it for the active mode.
    pub fn reset(&mut self) -> Result<()> {
        self.ticker.cancel();
        self.state.reset();

        self.emit(TimerEvent::Reset {
            mode: self.state.mode,
        })
    }

    /// Switches mode and resets. The countdown is not started.
    pub fn select_mode(&mut self, mode: Mode) -> Result<()> {
        self.ticker.cancel();
        self.state.select_mode(mode);

        self.emit(TimerEvent::ModeSelected { mode })
    }

    /// Handles one tick from the tick source.
    ///
    /// Ticks from a cancelled run, or that arrive while idle, are ignored.
    /// Returns true if this tick completed the countdown.
    pub fn tick(&mut self, tick: Tick) -> Result<bool> {
        if !self.state.running
            || !self.ticker.is_active()
            || tick.generation != self.ticker.generation()
        {
            debug!(generation = tick.generation, "stale tick ignored");
            return Ok(false);
        }

        let reached_zero = self.state.tick();

        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        })?;

        if reached_zero {
            self.complete()?;
        }
        Ok(reached_zero)
    }

    /// Handles the countdown reaching zero.
    fn complete(&mut self) -> Result<()> {
        self.ticker.cancel();
        self.state.running = false;

        let finished = self.state.mode;
        if finished == Mode::Focus {
            self.state.completed_focus_sessions += 1;
        }
        let next_mode = self.state.next_mode();

        info!(
            mode = %finished,
            sessions = self.state.completed_focus_sessions,
            next = %next_mode,
            "countdown completed"
        );

        self.emit(TimerEvent::Completed {
            mode: finished,
            completed_focus_sessions: self.state.completed_focus_sessions,
            next_mode,
        })?;

        self.select_mode(next_mode)
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns true while a recurring tick is active.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    fn emit(&self, event: TimerEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send timer event")
    }
}

// ============================================================================
// Tests
// ============================================================================
