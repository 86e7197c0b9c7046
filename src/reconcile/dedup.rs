//! At-most-once gate between detected transitions and the notification bus.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Tracks which dedup keys have already produced a notification.
///
/// Entries expire after the configured TTL, after which the *same* transition
/// may notify again if it genuinely recurs (a revert-and-redo cycle). This is
/// an explicitly owned value passed into the watcher, never ambient state;
/// callers supply `now` so expiry is deterministic under test.
#[derive(Debug)]
pub struct NotificationDedupCache {
    ttl: Duration,
    seen: HashMap<String, DateTime<Utc>>,
}

impl NotificationDedupCache {
    pub fn new(ttl: Duration) -> Self {
        NotificationDedupCache {
            ttl,
            seen: HashMap::new(),
        }
    }

    /// True exactly when `key` has not notified within the TTL window; the
    /// emission is recorded at `now` in that case.
    pub fn should_emit(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        match self.seen.get(key) {
            Some(&recorded) if now - recorded < self.ttl => false,
            _ => {
                self.seen.insert(key.to_string(), now);
                true
            }
        }
    }

    /// Drop expired entries. Invoked on a slower cadence than `should_emit`
    /// to bound memory without per-check bookkeeping.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.seen.retain(|_, &mut recorded| now - recorded < ttl);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
