//! Fetch-and-reconcile cycle body.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{NotificationSink, RfqApi};
use crate::model::Rfq;
use crate::observability::watcher_metrics;
use crate::reconcile::{diff, NotificationDedupCache, NotificationEvent, Snapshot};

/// Most recent failed poll, surfaced as a non-blocking indicator. A failed
/// cycle never aborts the schedule and never touches the baseline snapshot
/// or the dedup cache.
#[derive(Debug, Clone, Error)]
#[error("status poll failed at {at}: {message}")]
pub struct PollFailure {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Owns one viewing session's reconciliation state: the baseline snapshot,
/// the dedup cache, and the last-failure indicator.
pub struct RfqWatcher {
    api: Arc<dyn RfqApi>,
    sink: Arc<dyn NotificationSink>,
    dedup: NotificationDedupCache,
    baseline: Option<Snapshot>,
    failure_tx: watch::Sender<Option<PollFailure>>,
}

impl RfqWatcher {
    pub fn new(
        api: Arc<dyn RfqApi>,
        sink: Arc<dyn NotificationSink>,
        dedup: NotificationDedupCache,
    ) -> Self {
        let (failure_tx, _) = watch::channel(None);
        RfqWatcher {
            api,
            sink,
            dedup,
            baseline: None,
            failure_tx,
        }
    }

    /// Subscribe to the "last check failed" indicator. `None` means the most
    /// recent cycle succeeded.
    pub fn failure_watch(&self) -> watch::Receiver<Option<PollFailure>> {
        self.failure_tx.subscribe()
    }

    /// Run one fetch-and-reconcile cycle.
    ///
    /// The first successful cycle only establishes the baseline; transitions
    /// are detected from the second cycle onward. Each detected change is
    /// gated through the dedup cache before dispatch, so repeated fetches of
    /// an unchanged collection emit nothing.
    pub async fn run_cycle(&mut self) {
        let now = Utc::now();
        watcher_metrics().record_cycle();

        let collection = match self.api.fetch_rfq_collection().await {
            Ok(collection) => collection,
            Err(err) => {
                watcher_metrics().record_poll_failure();
                warn!(error = %err, "status poll failed; retrying at next tick");
                self.failure_tx.send_replace(Some(PollFailure {
                    at: now,
                    message: err.to_string(),
                }));
                return;
            }
        };

        let snapshot = Snapshot::capture(&collection, now);
        if let Some(baseline) = &self.baseline {
            for change in diff(baseline, &collection) {
                watcher_metrics().record_transition();
                let event = NotificationEvent::from_change(&change);
                let key = event.dedup_key();
                if self.dedup.should_emit(&key, now) {
                    watcher_metrics().record_notification_emitted();
                    info!(
                        rfq = %event.entity_id,
                        from = %event.previous_status,
                        to = %event.new_status,
                        audience = %event.audience,
                        "status transition detected"
                    );
                    self.sink.emit(event).await;
                } else {
                    watcher_metrics().record_notification_suppressed();
                    debug!(key = %key, "transition already notified; suppressed");
                }
            }
        } else {
            debug!(tracked = snapshot.len(), "baseline snapshot established");
        }

        self.baseline = Some(snapshot);
        self.failure_tx.send_replace(None);
    }

    /// Drop expired dedup entries; called by the poller on a slow cadence.
    pub fn purge_dedup(&mut self) {
        self.dedup.purge_expired(Utc::now());
    }

    /// Fold a post-transition entity returned by an explicit user action into
    /// the baseline, so the next poll does not re-announce a transition this
    /// session performed itself.
    pub fn absorb(&mut self, rfq: &Rfq) {
        if let Some(baseline) = self.baseline.take() {
            self.baseline = Some(baseline.updated(rfq));
        }
    }
}
