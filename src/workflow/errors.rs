use thiserror::Error;

use crate::model::{PoId, RfqId};
use crate::workflow::status::{RfqAction, RfqStatus};

/// Failure taxonomy for RFQ transitions and purchase-order creation.
///
/// `InvalidTransition` means the UI offered an action the current state does
/// not allow; the engine still rejects it defensively. `Validation` and
/// `DuplicatePo` are recoverable user-facing outcomes. `Transport` wraps a
/// failed mutation call and always propagates synchronously to the caller.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("action '{action}' is not legal while the RFQ is {status}")]
    InvalidTransition { action: RfqAction, status: RfqStatus },

    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("purchase order {po_id} already exists for RFQ {rfq_id}")]
    DuplicatePo { rfq_id: RfqId, po_id: PoId },

    #[error("no quote line covers product {product_id}")]
    MissingQuoteLine { product_id: String },

    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        WorkflowError::Transport {
            operation,
            source: source.into(),
        }
    }

    /// Whether the caller may retry the same action unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::Transport { .. })
    }
}
