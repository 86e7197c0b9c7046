//! Domain entities shared across the workflow engine, the reconciliation
//! pass, and the API boundary.

pub mod purchase_order;
pub mod rfq;

pub use purchase_order::{PoId, PoLine, PoStatus, PurchaseOrder};
pub use rfq::{Approval, ApprovalAction, QuoteLine, QuoteLineInput, Rfq, RfqId, RfqItem, VendorQuote};
