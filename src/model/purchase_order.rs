//! Purchase order derived from an approved RFQ's vendor quote.
//!
//! Lines are copied and priced at creation time; afterwards the PO lives its
//! own life and the `rfq_id` field is a back-reference only.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::rfq::RfqId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoId(pub String);

impl PoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PoId {
    fn from(value: &str) -> Self {
        PoId(value.to_string())
    }
}

impl From<String> for PoId {
    fn from(value: String) -> Self {
        PoId(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoStatus {
    Draft,
    Issued,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoLine {
    pub product_id: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub expected_delivery_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_id: PoId,
    /// Back-reference to the originating RFQ, never an ownership pointer.
    pub rfq_id: RfqId,
    pub lines: Vec<PoLine>,
    pub total_amount: Decimal,
    pub status: PoStatus,
    pub created_at: DateTime<Utc>,
}
