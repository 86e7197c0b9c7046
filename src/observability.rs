use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Watcher and notification pipeline metrics
#[derive(Debug, Default)]
pub struct WatcherMetrics {
    pub cycles: AtomicU64,
    pub poll_failures: AtomicU64,
    pub transitions_detected: AtomicU64,
    pub notifications_emitted: AtomicU64,
    pub notifications_suppressed: AtomicU64,
}

impl WatcherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_failure(&self) {
        self.poll_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transition(&self) {
        self.transitions_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification_emitted(&self) {
        self.notifications_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification_suppressed(&self) {
        self.notifications_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> WatcherStats {
        WatcherStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            poll_failures: self.poll_failures.load(Ordering::Relaxed),
            transitions_detected: self.transitions_detected.load(Ordering::Relaxed),
            notifications_emitted: self.notifications_emitted.load(Ordering::Relaxed),
            notifications_suppressed: self.notifications_suppressed.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "watcher metrics: cycles={}, poll_failures={}, transitions={}, emitted={}, suppressed={}",
            stats.cycles,
            stats.poll_failures,
            stats.transitions_detected,
            stats.notifications_emitted,
            stats.notifications_suppressed
        );
    }
}

#[derive(Debug, Clone)]
pub struct WatcherStats {
    pub cycles: u64,
    pub poll_failures: u64,
    pub transitions_detected: u64,
    pub notifications_emitted: u64,
    pub notifications_suppressed: u64,
}

/// Global metrics instance
static WATCHER_METRICS: std::sync::LazyLock<WatcherMetrics> =
    std::sync::LazyLock::new(WatcherMetrics::new);

pub fn watcher_metrics() -> &'static WatcherMetrics {
    &WATCHER_METRICS
}

/// Time an operation and log its duration on completion
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}
