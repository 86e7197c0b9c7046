//! RFQ entity and its nested value types.
//!
//! These mirror the wire representation served by the procurement API; the
//! transition functions in `workflow` are the only code that should mutate
//! status or the stamped timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflow::status::RfqStatus;

/// Opaque stable identifier for an RFQ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RfqId(pub String);

impl RfqId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RfqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RfqId {
    fn from(value: &str) -> Self {
        RfqId(value.to_string())
    }
}

/// One requested line on an RFQ. Immutable once the RFQ leaves `Draft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqItem {
    pub product_id: String,
    /// Positive by construction of the submitting form; re-checked when a
    /// quote is recorded against it.
    pub quantity: u32,
    pub unit: String,
}

/// Raw quote line as submitted by the vendor form, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLineInput {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub expected_delivery_date: Option<NaiveDate>,
}

/// Validated, priced quote line attached to an RFQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub product_id: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: Decimal,
    pub expected_delivery_date: NaiveDate,
}

impl QuoteLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The vendor's priced response, recorded at most once per submission cycle.
///
/// Invariant: every RFQ item has a matching line and no line references a
/// product absent from the RFQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorQuote {
    pub lines: Vec<QuoteLine>,
    pub vendor_notes: String,
    /// Derived: sum of per-line totals.
    pub vendor_price: Decimal,
}

impl VendorQuote {
    pub fn line_for(&self, product_id: &str) -> Option<&QuoteLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn total_of(lines: &[QuoteLine]) -> Decimal {
        lines.iter().map(QuoteLine::line_total).sum()
    }
}

/// A single manager decision, appended to the RFQ's approval history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub action: ApprovalAction,
    pub comments: String,
    pub timestamp: DateTime<Utc>,
    pub actor_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalAction::Approve => write!(f, "approve"),
            ApprovalAction::Reject => write!(f, "reject"),
        }
    }
}

/// Request for Quotation: the tracked procurement entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfq {
    pub id: RfqId,
    /// Human-readable number, unique, display only.
    pub rfq_number: String,
    pub status: RfqStatus,
    pub vendor_id: String,
    pub order_deadline: NaiveDate,
    /// Stamped exactly once by the `send` transition.
    pub sent_date: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub items: Vec<RfqItem>,
    /// Present exactly when `status.quote_expected()`.
    pub vendor_quote: Option<VendorQuote>,
    /// Present only while `status == Rejected`.
    pub rejection_reason: Option<String>,
    /// Append-only decision history; current status reflects the latest entry.
    pub approvals: Vec<Approval>,
}

impl Rfq {
    /// Fresh draft with no quote, no decisions, and no stamped dates.
    pub fn draft(
        id: impl Into<RfqId>,
        rfq_number: impl Into<String>,
        vendor_id: impl Into<String>,
        order_deadline: NaiveDate,
        items: Vec<RfqItem>,
    ) -> Self {
        Rfq {
            id: id.into(),
            rfq_number: rfq_number.into(),
            status: RfqStatus::Draft,
            vendor_id: vendor_id.into(),
            order_deadline,
            sent_date: None,
            approved_at: None,
            rejected_at: None,
            items,
            vendor_quote: None,
            rejection_reason: None,
            approvals: Vec::new(),
        }
    }

    pub fn item(&self, product_id: &str) -> Option<&RfqItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }
}

impl From<String> for RfqId {
    fn from(value: String) -> Self {
        RfqId(value)
    }
}
