//! Change detection between polls: snapshot capture, status diffing, and the
//! notification dedup gate.

pub mod dedup;
pub mod diff;
pub mod notification;
pub mod snapshot;

pub use dedup::NotificationDedupCache;
pub use diff::{diff, StatusChange};
pub use notification::{audience_for, NotificationEvent, TargetAudience};
pub use snapshot::Snapshot;
