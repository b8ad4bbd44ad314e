//! Background tick loop.
//!
//! [`Runner::spawn`] moves a [`Model`] onto a dedicated thread that owns
//! it exclusively and steps it at a fixed cadence. After every tick the
//! thread sends a [`TickUpdate`] (owned report plus grid snapshot) over a
//! crossbeam channel, so a GUI or CLI can plot and render without ever
//! touching the model.
//!
//! The channel holds at most [`UPDATE_CAPACITY`] updates. When the reader
//! falls behind, the tick thread blocks on the full channel instead of
//! queueing more snapshots, and resumes once the reader drains it.
//!
//! Stopping is cooperative: [`RunHandle::stop`] raises a flag that the
//! loop checks between ticks and while waiting on a full channel. A tick
//! in progress always completes. [`RunHandle::join`] hands the model back
//! together with the reason the loop ended.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, SendTimeoutError, Sender};
use pasture_core::StepError;
use tracing::{debug, info, warn};

use crate::model::{Model, TickReport};
use crate::snapshot::GridSnapshot;

/// Updates buffered between the tick thread and its reader.
pub const UPDATE_CAPACITY: usize = 64;

/// How often a blocked send re-checks the stop flag.
const STOP_POLL: Duration = Duration::from_millis(10);

/// Cadence and budget for a background run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Minimum wall-clock time per tick. Zero runs flat out.
    pub tick_interval: Duration,
    /// Stop after this many ticks. `None` runs until stopped.
    pub max_ticks: Option<u64>,
}

/// What the tick thread publishes after each tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickUpdate {
    /// The tick's report.
    pub report: TickReport,
    /// The grid after reconciliation.
    pub snapshot: GridSnapshot,
}

/// Why a background run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// [`RunHandle::stop`] was called.
    Requested,
    /// `max_ticks` ticks were run.
    BudgetExhausted,
    /// A tick failed; the model is consistent but the run was halted.
    Failed(StepError),
    /// The update receiver was dropped.
    Disconnected,
}

/// Errors from managing the tick thread.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The OS refused to start the thread.
    #[error("failed to spawn tick thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// The tick thread panicked; the model is lost.
    #[error("tick thread panicked")]
    Panicked,
}

/// Model and stop reason returned by [`RunHandle::join`].
#[derive(Debug)]
pub struct RunOutcome {
    /// The model, exactly as the last tick left it.
    pub model: Model,
    /// Why the loop ended.
    pub reason: StopReason,
}

/// Entry point for background runs.
pub struct Runner;

impl Runner {
    /// Start stepping `model` on a thread named `pasture-tick`.
    pub fn spawn(model: Model, config: RunnerConfig) -> Result<RunHandle, RunnerError> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::bounded(UPDATE_CAPACITY);
        let state = TickLoop {
            model,
            config,
            stop: Arc::clone(&stop),
            updates: tx,
        };
        let thread = std::thread::Builder::new()
            .name("pasture-tick".into())
            .spawn(move || state.run())?;
        Ok(RunHandle {
            stop,
            updates: rx,
            thread,
        })
    }
}

/// Control side of a background run.
pub struct RunHandle {
    stop: Arc<AtomicBool>,
    updates: Receiver<TickUpdate>,
    thread: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Ask the loop to stop after the tick in progress.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Per-tick updates, in tick order.
    pub fn updates(&self) -> &Receiver<TickUpdate> {
        &self.updates
    }

    /// Whether the tick thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to end and recover the model.
    ///
    /// Does not request a stop: call [`stop`](Self::stop) first unless a
    /// tick budget was set. A budget larger than [`UPDATE_CAPACITY`] also
    /// needs the updates drained, or the loop waits on the full channel.
    pub fn join(self) -> Result<RunOutcome, RunnerError> {
        self.thread.join().map_err(|_| RunnerError::Panicked)
    }
}

/// State owned by the tick thread.
struct TickLoop {
    model: Model,
    config: RunnerConfig,
    stop: Arc<AtomicBool>,
    updates: Sender<TickUpdate>,
}

impl TickLoop {
    fn run(mut self) -> RunOutcome {
        info!(
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            max_ticks = ?self.config.max_ticks,
            "tick thread started"
        );
        self.model.set_running(true);
        let mut ticks = 0u64;
        let reason = loop {
            if self.stop.load(Ordering::Acquire) {
                break StopReason::Requested;
            }
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                break StopReason::BudgetExhausted;
            }
            let tick_start = Instant::now();

            let report = match self.model.step() {
                Ok(report) => report,
                Err(err) => break StopReason::Failed(err),
            };
            ticks += 1;
            let update = TickUpdate {
                report,
                snapshot: self.model.snapshot(),
            };
            if let Some(reason) = self.publish(update) {
                break reason;
            }

            let elapsed = tick_start.elapsed();
            if let Some(remaining) = self.config.tick_interval.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        };
        self.model.set_running(false);
        match &reason {
            StopReason::Failed(err) => warn!(ticks, error = %err, "tick thread stopped on error"),
            _ => info!(ticks, reason = ?reason, "tick thread stopped"),
        }
        RunOutcome {
            model: self.model,
            reason,
        }
    }

    /// Send `update`, waiting while the channel is full.
    ///
    /// A stop request while waiting drops the update.
    fn publish(&self, mut update: TickUpdate) -> Option<StopReason> {
        loop {
            match self.updates.send_timeout(update, STOP_POLL) {
                Ok(()) => return None,
                Err(SendTimeoutError::Disconnected(_)) => return Some(StopReason::Disconnected),
                Err(SendTimeoutError::Timeout(pending)) => {
                    if self.stop.load(Ordering::Acquire) {
                        debug!(tick = %pending.report.tick, "update dropped on stop");
                        return Some(StopReason::Requested);
                    }
                    update = pending;
                }
            }
        }
    }
}
