//! Async engine wrapping the pure transitions around the mutation endpoints.
//!
//! Every method validates locally against the transition table before the
//! network call, so an illegal action never leaves the process, and a failed
//! call leaves the caller's copy of the entity untouched. The duplicate-PO
//! guard is memoized in a bounded TTL cache so a retry storm cannot issue a
//! second creation request.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::RfqApi;
use crate::model::{ApprovalAction, PoId, QuoteLineInput, Rfq, RfqId};
use crate::workflow::errors::WorkflowError;
use crate::workflow::status::RfqStatus;
use crate::workflow::transitions;

const PO_GUARD_CAPACITY: u64 = 1024;
const PO_GUARD_TTL: Duration = Duration::from_secs(300);

pub struct WorkflowEngine {
    api: Arc<dyn RfqApi>,
    /// RFQ id -> known purchase order id. Positive entries only; a PO never
    /// un-exists, so the TTL merely bounds memory.
    po_guard: Cache<RfqId, PoId>,
}

impl WorkflowEngine {
    pub fn new(api: Arc<dyn RfqApi>) -> Self {
        let po_guard = Cache::builder()
            .max_capacity(PO_GUARD_CAPACITY)
            .time_to_live(PO_GUARD_TTL)
            .build();
        Self { api, po_guard }
    }

    /// `Draft -> Sent`.
    pub async fn send(&self, rfq: &Rfq) -> Result<Rfq, WorkflowError> {
        transitions::apply_send(rfq, chrono::Utc::now())?;
        let updated = self.api.send_rfq(&rfq.id).await?;
        info!(rfq = %rfq.id, status = %updated.status, "RFQ sent to vendor");
        Ok(updated)
    }

    /// `Sent -> Received`, recording the vendor's priced response.
    pub async fn record_quote(
        &self,
        rfq: &Rfq,
        lines: &[QuoteLineInput],
        notes: &str,
    ) -> Result<Rfq, WorkflowError> {
        transitions::apply_quote(rfq, lines, notes)?;
        let updated = self.api.record_quote(&rfq.id, lines, notes).await?;
        info!(
            rfq = %rfq.id,
            vendor_price = %updated
                .vendor_quote
                .as_ref()
                .map(|q| q.vendor_price.to_string())
                .unwrap_or_default(),
            "vendor quote recorded"
        );
        Ok(updated)
    }

    /// `Received -> Approved`.
    pub async fn approve(
        &self,
        rfq: &Rfq,
        comments: &str,
        actor_id: &str,
    ) -> Result<Rfq, WorkflowError> {
        self.decide(rfq, ApprovalAction::Approve, comments, actor_id).await
    }

    /// `Received -> Rejected`. Requires non-empty comments.
    pub async fn reject(
        &self,
        rfq: &Rfq,
        comments: &str,
        actor_id: &str,
    ) -> Result<Rfq, WorkflowError> {
        self.decide(rfq, ApprovalAction::Reject, comments, actor_id).await
    }

    async fn decide(
        &self,
        rfq: &Rfq,
        action: ApprovalAction,
        comments: &str,
        actor_id: &str,
    ) -> Result<Rfq, WorkflowError> {
        transitions::apply_decision(rfq, action, comments, actor_id, chrono::Utc::now())?;
        let updated = self.api.decide_rfq(&rfq.id, action, comments, actor_id).await?;
        info!(rfq = %rfq.id, action = %action, status = %updated.status, "decision recorded");
        Ok(updated)
    }

    /// `Rejected -> Sent`, after the requester has edited the RFQ.
    pub async fn resubmit(&self, rfq: &Rfq) -> Result<Rfq, WorkflowError> {
        transitions::apply_resubmit(rfq, chrono::Utc::now())?;
        let updated = self.api.resubmit_rfq(&rfq.id).await?;
        info!(rfq = %rfq.id, "RFQ resubmitted to vendor");
        Ok(updated)
    }

    /// Create the purchase order for an approved RFQ, at most once.
    ///
    /// The existence check runs before the creation request so a retry after
    /// a lost response cannot double-create. A known PO id short-circuits via
    /// the memoized guard without touching the backend.
    pub async fn create_purchase_order(&self, rfq: &Rfq) -> Result<PoId, WorkflowError> {
        if rfq.status != RfqStatus::Approved {
            return Err(WorkflowError::InvalidTransition {
                action: crate::workflow::status::RfqAction::CreatePo,
                status: rfq.status,
            });
        }

        if let Some(existing) = self.po_guard.get(&rfq.id).await {
            warn!(rfq = %rfq.id, po = %existing, "purchase order already created");
            return Err(WorkflowError::DuplicatePo {
                rfq_id: rfq.id.clone(),
                po_id: existing,
            });
        }

        if let Some(existing) = self.api.check_existing_po(&rfq.id).await? {
            self.po_guard.insert(rfq.id.clone(), existing.clone()).await;
            warn!(rfq = %rfq.id, po = %existing, "purchase order already exists upstream");
            return Err(WorkflowError::DuplicatePo {
                rfq_id: rfq.id.clone(),
                po_id: existing,
            });
        }

        let po_id = self.api.create_po_from_rfq(&rfq.id).await?;
        self.po_guard.insert(rfq.id.clone(), po_id.clone()).await;
        info!(rfq = %rfq.id, po = %po_id, "purchase order created");
        Ok(po_id)
    }
}
