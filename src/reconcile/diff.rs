//! Snapshot diffing: one linear pass, no quadratic comparisons.

use crate::model::{Rfq, RfqId};
use crate::workflow::status::RfqStatus;

use super::snapshot::Snapshot;

/// One observed status transition of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: RfqId,
    pub from: RfqStatus,
    pub to: RfqStatus,
}

/// Compare the current collection against the previous snapshot.
///
/// Returns one change per entity whose status differs, in collection order.
/// Entities only present in the current collection are newly created, not
/// transitioned, and emit nothing; entities that vanished emit nothing
/// either (this engine produces no delete events).
pub fn diff(baseline: &Snapshot, current: &[Rfq]) -> Vec<StatusChange> {
    let mut changes = Vec::new();
    for rfq in current {
        match baseline.status_of(&rfq.id) {
            Some(previous) if previous != rfq.status => changes.push(StatusChange {
                id: rfq.id.clone(),
                from: previous,
                to: rfq.status,
            }),
            _ => {}
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::model::Rfq;

    fn rfq(id: &str, status: RfqStatus) -> Rfq {
        let mut rfq = Rfq::draft(
            id,
            format!("RFQ-{id}"),
            "V-1",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            vec![],
        );
        rfq.status = status;
        rfq
    }

    #[test]
    fn self_diff_is_empty() {
        let collection = vec![rfq("R1", RfqStatus::Sent), rfq("R2", RfqStatus::Draft)];
        let snapshot = Snapshot::capture(&collection, Utc::now());
        assert!(diff(&snapshot, &collection).is_empty());
    }

    #[test]
    fn changes_come_out_in_collection_order() {
        let before = vec![rfq("R1", RfqStatus::Sent), rfq("R2", RfqStatus::Received)];
        let snapshot = Snapshot::capture(&before, Utc::now());
        let after = vec![rfq("R2", RfqStatus::Approved), rfq("R1", RfqStatus::Received)];

        let changes = diff(&snapshot, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].id.as_str(), "R2");
        assert_eq!(changes[0].from, RfqStatus::Received);
        assert_eq!(changes[0].to, RfqStatus::Approved);
        assert_eq!(changes[1].id.as_str(), "R1");
    }

    #[test]
    fn creations_and_deletions_emit_nothing() {
        let before = vec![rfq("R1", RfqStatus::Sent)];
        let snapshot = Snapshot::capture(&before, Utc::now());
        let after = vec![rfq("R2", RfqStatus::Draft)];
        assert!(diff(&snapshot, &after).is_empty());
    }
}
