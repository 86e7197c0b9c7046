//! Debounced, pausable polling loop.
//!
//! The loop owns the watcher and awaits every cycle inline, so two
//! reconciliation passes can never overlap and control messages are only
//! processed between cycles. Interval ticks and manual refresh requests both
//! arm the same debounce window; whatever arrives while a cycle is pending
//! coalesces into it.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::watcher::{PollFailure, RfqWatcher};

/// Parked deadline used while no cycle is pending; never actually fires.
const IDLE_PARK: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy)]
pub struct PollerSettings {
    /// Gap between scheduled fetch-and-reconcile cycles.
    pub interval: Duration,
    /// Debounce window coalescing near-simultaneous refresh triggers.
    pub debounce: Duration,
    /// Cadence for purging expired dedup entries.
    pub purge_interval: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        PollerSettings {
            interval: Duration::from_secs(15),
            debounce: Duration::from_secs(2),
            purge_interval: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
enum PollerCommand {
    RefreshNow,
    Pause,
    Resume,
    Stop,
}

pub struct DebouncedPoller {
    watcher: RfqWatcher,
    settings: PollerSettings,
}

impl DebouncedPoller {
    pub fn new(watcher: RfqWatcher, settings: PollerSettings) -> Self {
        DebouncedPoller { watcher, settings }
    }

    /// Start the schedule: one immediate cycle, then interval-driven cycles
    /// behind the debounce window.
    pub fn spawn(self) -> PollerHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let failure_rx = self.watcher.failure_watch();
        let task = tokio::spawn(run_loop(self.watcher, self.settings, cmd_rx));
        PollerHandle {
            cmd_tx,
            failure_rx,
            task,
        }
    }
}

/// Control handle for a spawned poller. Dropping the handle stops the loop
/// (the command channel closes).
pub struct PollerHandle {
    cmd_tx: mpsc::Sender<PollerCommand>,
    failure_rx: watch::Receiver<Option<PollFailure>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Request an out-of-schedule cycle; coalesced with any pending one.
    pub async fn refresh_now(&self) {
        let _ = self.cmd_tx.send(PollerCommand::RefreshNow).await;
    }

    /// Suspend the schedule and cancel any pending cycle. Callers must pause
    /// for the duration of a redirect side effect so the poller cannot race
    /// a transition it just detected.
    pub async fn pause(&self) {
        let _ = self.cmd_tx.send(PollerCommand::Pause).await;
    }

    /// Re-arm the schedule with a fresh immediate cycle.
    pub async fn resume(&self) {
        let _ = self.cmd_tx.send(PollerCommand::Resume).await;
    }

    /// Most recent fetch failure; `None` once a cycle has succeeded again.
    pub fn last_failure(&self) -> Option<PollFailure> {
        self.failure_rx.borrow().clone()
    }

    /// Stop the loop and wait for it to wind down.
    pub async fn stop(self) {
        let _ = self.cmd_tx.send(PollerCommand::Stop).await;
        let _ = self.task.await;
    }
}

async fn run_loop(
    mut watcher: RfqWatcher,
    settings: PollerSettings,
    mut cmd_rx: mpsc::Receiver<PollerCommand>,
) {
    info!(
        interval_s = settings.interval.as_secs(),
        debounce_ms = settings.debounce.as_millis() as u64,
        "poller started"
    );
    watcher.run_cycle().await;

    let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut paused = false;
    // Deadline of the debounced cycle currently pending, if any.
    let mut pending: Option<Instant> = None;
    let mut last_purge = Instant::now();

    loop {
        let deadline = pending.unwrap_or_else(|| Instant::now() + IDLE_PARK);
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                None | Some(PollerCommand::Stop) => {
                    debug!("poller stopping");
                    break;
                }
                Some(PollerCommand::Pause) => {
                    pending = None;
                    paused = true;
                    debug!("poller paused");
                }
                Some(PollerCommand::Resume) => {
                    if paused {
                        paused = false;
                        pending = None;
                        debug!("poller resumed; running fresh cycle");
                        watcher.run_cycle().await;
                        ticker.reset();
                    }
                }
                Some(PollerCommand::RefreshNow) => {
                    if !paused && pending.is_none() {
                        pending = Some(Instant::now() + settings.debounce);
                    }
                }
            },
            _ = ticker.tick(), if !paused => {
                if pending.is_none() {
                    pending = Some(Instant::now() + settings.debounce);
                }
            }
            _ = sleep_until(deadline), if pending.is_some() && !paused => {
                pending = None;
                watcher.run_cycle().await;
                if last_purge.elapsed() >= settings.purge_interval {
                    watcher.purge_dedup();
                    last_purge = Instant::now();
                }
            }
        }
    }
}
