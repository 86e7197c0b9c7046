//! Polling layer: the debounced scheduler and the per-session watcher it
//! drives.

pub mod poller;
pub mod watcher;

pub use poller::{DebouncedPoller, PollerHandle, PollerSettings};
pub use watcher::{PollFailure, RfqWatcher};
