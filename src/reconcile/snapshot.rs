//! Point-in-time baseline of tracked RFQ statuses.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::{Rfq, RfqId};
use crate::workflow::status::RfqStatus;

/// Immutable `{id -> status}` copy of the collection, captured after each
/// successful poll and used as the diff baseline for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    taken_at: DateTime<Utc>,
    statuses: HashMap<RfqId, RfqStatus>,
}

impl Snapshot {
    pub fn capture(collection: &[Rfq], taken_at: DateTime<Utc>) -> Self {
        let statuses = collection
            .iter()
            .map(|rfq| (rfq.id.clone(), rfq.status))
            .collect();
        Snapshot { taken_at, statuses }
    }

    pub fn empty(taken_at: DateTime<Utc>) -> Self {
        Snapshot {
            taken_at,
            statuses: HashMap::new(),
        }
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn status_of(&self, id: &RfqId) -> Option<RfqStatus> {
        self.statuses.get(id).copied()
    }

    /// Copy of this snapshot with one entity's status replaced by the given
    /// post-transition entity. Used when an explicit user action already
    /// returned the updated RFQ.
    pub fn updated(&self, rfq: &Rfq) -> Snapshot {
        let mut statuses = self.statuses.clone();
        statuses.insert(rfq.id.clone(), rfq.status);
        Snapshot {
            taken_at: self.taken_at,
            statuses,
        }
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
