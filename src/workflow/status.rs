//! RFQ lifecycle states and the static transition table.
//!
//! The table is pure data: each row names the source state, the action that
//! moves it, the resulting state, and the side-effect hook the engine runs
//! when the row fires. Guard logic lives in `workflow::transitions`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states for an RFQ.
///
/// `PoCreated` is the terminal sub-state reached from `Approved` once the
/// purchase order has been derived. `Rejected` is re-entrant: an edited RFQ
/// may be resubmitted, returning to `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RfqStatus {
    Draft,
    Sent,
    Received,
    Approved,
    Rejected,
    PoCreated,
}

impl RfqStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RfqStatus::PoCreated)
    }

    /// True once a vendor quote must be present on the entity.
    pub fn quote_expected(&self) -> bool {
        matches!(
            self,
            RfqStatus::Received | RfqStatus::Approved | RfqStatus::Rejected | RfqStatus::PoCreated
        )
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RfqStatus::Draft => "DRAFT",
            RfqStatus::Sent => "SENT",
            RfqStatus::Received => "RECEIVED",
            RfqStatus::Approved => "APPROVED",
            RfqStatus::Rejected => "REJECTED",
            RfqStatus::PoCreated => "PO_CREATED",
        };
        write!(f, "{label}")
    }
}

/// User-triggered actions that can move an RFQ between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfqAction {
    Send,
    RecordQuote,
    Approve,
    Reject,
    Resubmit,
    CreatePo,
}

impl fmt::Display for RfqAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RfqAction::Send => "send",
            RfqAction::RecordQuote => "record_quote",
            RfqAction::Approve => "approve",
            RfqAction::Reject => "reject",
            RfqAction::Resubmit => "resubmit",
            RfqAction::CreatePo => "create_po",
        };
        write!(f, "{label}")
    }
}

/// Side effect the engine performs when a transition rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    StampSentDate,
    AttachVendorQuote,
    RecordApproval,
    RecordRejection,
    ClearRejection,
    DerivePurchaseOrder,
}

/// One legal edge in the RFQ state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: RfqStatus,
    pub action: RfqAction,
    pub to: RfqStatus,
    pub effect: TransitionEffect,
}

/// Every legal transition. Anything not listed here is rejected with
/// `WorkflowError::InvalidTransition`.
pub const TRANSITION_TABLE: &[TransitionRule] = &[
    TransitionRule {
        from: RfqStatus::Draft,
        action: RfqAction::Send,
        to: RfqStatus::Sent,
        effect: TransitionEffect::StampSentDate,
    },
    TransitionRule {
        from: RfqStatus::Sent,
        action: RfqAction::RecordQuote,
        to: RfqStatus::Received,
        effect: TransitionEffect::AttachVendorQuote,
    },
    TransitionRule {
        from: RfqStatus::Received,
        action: RfqAction::Approve,
        to: RfqStatus::Approved,
        effect: TransitionEffect::RecordApproval,
    },
    TransitionRule {
        from: RfqStatus::Received,
        action: RfqAction::Reject,
        to: RfqStatus::Rejected,
        effect: TransitionEffect::RecordRejection,
    },
    TransitionRule {
        from: RfqStatus::Rejected,
        action: RfqAction::Resubmit,
        to: RfqStatus::Sent,
        effect: TransitionEffect::ClearRejection,
    },
    TransitionRule {
        from: RfqStatus::Approved,
        action: RfqAction::CreatePo,
        to: RfqStatus::PoCreated,
        effect: TransitionEffect::DerivePurchaseOrder,
    },
];

/// Look up the rule for `(from, action)`, if the edge is legal.
pub fn rule_for(from: RfqStatus, action: RfqAction) -> Option<&'static TransitionRule> {
    TRANSITION_TABLE
        .iter()
        .find(|rule| rule.from == from && rule.action == action)
}

pub fn is_legal(from: RfqStatus, action: RfqAction) -> bool {
    rule_for(from, action).is_some()
}

/// Actions a UI may legally offer for an RFQ in `from`.
pub fn allowed_actions(from: RfqStatus) -> Vec<RfqAction> {
    TRANSITION_TABLE
        .iter()
        .filter(|rule| rule.from == from)
        .map(|rule| rule.action)
        .collect()
}
