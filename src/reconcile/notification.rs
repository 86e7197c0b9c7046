//! Notification events carried from a detected transition to the bus.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::RfqId;
use crate::workflow::status::RfqStatus;

use super::diff::StatusChange;

/// Who a transition notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    /// The team that raised the RFQ and tracks its progress.
    Procurement,
    /// Managers who must act on a freshly received quote.
    Approvers,
}

impl fmt::Display for TargetAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAudience::Procurement => write!(f, "procurement"),
            TargetAudience::Approvers => write!(f, "approvers"),
        }
    }
}

/// Routing policy: a quote landing needs an approver's attention, everything
/// else goes back to the procurement team.
pub fn audience_for(to: RfqStatus) -> TargetAudience {
    match to {
        RfqStatus::Received => TargetAudience::Approvers,
        _ => TargetAudience::Procurement,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub entity_id: RfqId,
    pub previous_status: RfqStatus,
    pub new_status: RfqStatus,
    pub audience: TargetAudience,
}

impl NotificationEvent {
    pub fn from_change(change: &StatusChange) -> Self {
        NotificationEvent {
            entity_id: change.id.clone(),
            previous_status: change.from,
            new_status: change.to,
            audience: audience_for(change.to),
        }
    }

    /// Stable key identifying this specific transition of this entity.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.entity_id, self.previous_status, self.new_status
        )
    }
}
