//! Recurring one-second tick sources.
//!
//! A tick source owns at most one recurring tick at a time. Each start
//! bumps a generation number carried by every tick it emits, so ticks
//! that were already queued when the source was cancelled can be told
//! apart from live ones.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// One elapsed period of a tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Generation of the source run that produced this tick
    pub generation: u64,
}

/// A recurring tick that can be started and cancelled.
pub trait TickSource {
    /// Begins the recurring tick.
    ///
    /// Returns false without doing anything if a tick is already active.
    fn start(&mut self) -> bool;

    /// Cancels the recurring tick if one is active.
    fn cancel(&mut self);

    /// Returns true while a recurring tick is active.
    fn is_active(&self) -> bool;

    /// Generation of the most recent start.
    fn generation(&self) -> u64;
}

// ============================================================================
// IntervalTicker
// ============================================================================

/// Tick source backed by a spawned `tokio::time::interval` task.
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<Tick>,
    period: Duration,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl IntervalTicker {
    /// Creates a ticker that fires once per second.
    pub fn new(tx: mpsc::UnboundedSender<Tick>) -> Self {
        Self::with_period(tx, Duration::from_secs(1))
    }

    /// Creates a ticker with a custom period.
    pub fn with_period(tx: mpsc::UnboundedSender<Tick>, period: Duration) -> Self {
        Self {
            tx,
            period,
            handle: None,
            generation: 0,
        }
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }

        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();

        self.handle = Some(tokio::spawn(async move {
            // The first tick fires one full period after start.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));

        debug!(generation, "tick source started");
        true
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(generation = self.generation, "tick source cancelled");
        }
    }

    fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for IntervalTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalTicker")
            .field("period", &self.period)
            .field("generation", &self.generation)
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// MockTickSource
// ============================================================================

#[derive(Debug, Default)]
struct MockTickLog {
    active: bool,
    generation: u64,
    starts: usize,
    cancels: usize,
    max_active: usize,
}

/// Tick source for testing. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MockTickSource {
    log: Arc<Mutex<MockTickLog>>,
}

impl MockTickSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a tick for the current generation.
    #[must_use]
    pub fn tick(&self) -> Tick {
        Tick {
            generation: self.log.lock().unwrap().generation,
        }
    }

    /// Number of starts that actually began a tick.
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.log.lock().unwrap().starts
    }

    /// Number of cancels that stopped an active tick.
    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.log.lock().unwrap().cancels
    }

    /// Highest number of ticks that were ever active at once.
    #[must_use]
    pub fn max_active(&self) -> usize {
        self.log.lock().unwrap().max_active
    }
}

impl TickSource for MockTickSource {
    fn start(&mut self) -> bool {
        let mut log = self.log.lock().unwrap();
        if log.active {
            return false;
        }
        log.active = true;
        log.generation += 1;
        log.starts += 1;
        log.max_active = log.max_active.max(1);
        true
    }

    fn cancel(&mut self) {
        let mut log = self.log.lock().unwrap();
        if log.active {
            log.active = false;
            log.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.log.lock().unwrap().active
    }

    fn generation(&self) -> u64 {
        self.log.lock().unwrap().generation
    }
}

// ============================================================================
// Tests
// ============================================================================
