//! Boundary contracts to the procurement backend and the notification bus.
//!
//! The crate never speaks a wire protocol itself; integrators implement
//! `RfqApi` over whatever transport the deployment uses. Mutations must be
//! atomic and return the post-transition entity so callers can replace their
//! local copy without a re-fetch.

use async_trait::async_trait;

use crate::model::{ApprovalAction, PoId, QuoteLineInput, Rfq, RfqId};
use crate::reconcile::NotificationEvent;
use crate::workflow::errors::WorkflowError;

pub mod memory;

pub use memory::{InMemoryRfqApi, RecordingSink};

#[async_trait]
pub trait RfqApi: Send + Sync {
    /// Idempotent read of the full tracked collection; drives polling.
    async fn fetch_rfq_collection(&self) -> Result<Vec<Rfq>, WorkflowError>;

    async fn send_rfq(&self, id: &RfqId) -> Result<Rfq, WorkflowError>;

    async fn record_quote(
        &self,
        id: &RfqId,
        lines: &[QuoteLineInput],
        notes: &str,
    ) -> Result<Rfq, WorkflowError>;

    async fn decide_rfq(
        &self,
        id: &RfqId,
        action: ApprovalAction,
        comments: &str,
        actor_id: &str,
    ) -> Result<Rfq, WorkflowError>;

    async fn resubmit_rfq(&self, id: &RfqId) -> Result<Rfq, WorkflowError>;

    /// Derives and persists the purchase order, returning its id.
    async fn create_po_from_rfq(&self, id: &RfqId) -> Result<PoId, WorkflowError>;

    /// Existence probe backing the duplicate-PO guard.
    async fn check_existing_po(&self, rfq_id: &RfqId) -> Result<Option<PoId>, WorkflowError>;
}

/// Fire-and-forget dispatch to the notification bus. The watcher decides
/// *whether* an event is emitted; delivery (toast, push, email) is not its
/// concern.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn emit(&self, event: NotificationEvent);
}
