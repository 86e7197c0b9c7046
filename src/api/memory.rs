//! In-memory reference backend.
//!
//! Implements `RfqApi` over the pure transition functions so integration
//! tests and the demo CLI can exercise the full workflow without a real
//! procurement service. A failure toggle simulates an unreachable backend
//! for poll-error scenarios.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::model::{ApprovalAction, PoId, PurchaseOrder, QuoteLineInput, Rfq, RfqId};
use crate::reconcile::NotificationEvent;
use crate::workflow::errors::WorkflowError;
use crate::workflow::po_derivation::derive_purchase_order;
use crate::workflow::transitions;

use super::{NotificationSink, RfqApi};

#[derive(Default)]
struct Store {
    /// Collection order is preserved; fetch returns it verbatim so diff
    /// ordering is stable.
    rfqs: Vec<Rfq>,
    purchase_orders: Vec<PurchaseOrder>,
    fail_fetches: bool,
}

#[derive(Default)]
pub struct InMemoryRfqApi {
    store: Mutex<Store>,
    fetches: AtomicU64,
}

impl InMemoryRfqApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rfqs(rfqs: Vec<Rfq>) -> Self {
        let api = Self::new();
        {
            let mut store = api.store.lock().expect("store poisoned");
            store.rfqs = rfqs;
        }
        api
    }

    pub fn seed(&self, rfq: Rfq) {
        self.store.lock().expect("store poisoned").rfqs.push(rfq);
    }

    /// Make subsequent `fetch_rfq_collection` calls fail until cleared.
    pub fn set_fetch_failure(&self, fail: bool) {
        self.store.lock().expect("store poisoned").fail_fetches = fail;
    }

    /// Number of collection fetches served (or refused) so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn purchase_order(&self, po_id: &PoId) -> Option<PurchaseOrder> {
        self.store
            .lock()
            .expect("store poisoned")
            .purchase_orders
            .iter()
            .find(|po| &po.po_id == po_id)
            .cloned()
    }

    fn update<F>(&self, id: &RfqId, apply: F) -> Result<Rfq, WorkflowError>
    where
        F: FnOnce(&Rfq) -> Result<Rfq, WorkflowError>,
    {
        let mut store = self.store.lock().expect("store poisoned");
        let slot = store
            .rfqs
            .iter_mut()
            .find(|rfq| &rfq.id == id)
            .ok_or_else(|| {
                WorkflowError::transport("lookup", anyhow::anyhow!("unknown RFQ {id}"))
            })?;
        let updated = apply(slot)?;
        *slot = updated.clone();
        Ok(updated)
    }
}

#[async_trait]
impl RfqApi for InMemoryRfqApi {
    async fn fetch_rfq_collection(&self) -> Result<Vec<Rfq>, WorkflowError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let store = self.store.lock().expect("store poisoned");
        if store.fail_fetches {
            return Err(WorkflowError::transport(
                "fetch_rfq_collection",
                anyhow::anyhow!("simulated backend outage"),
            ));
        }
        Ok(store.rfqs.clone())
    }

    async fn send_rfq(&self, id: &RfqId) -> Result<Rfq, WorkflowError> {
        self.update(id, |rfq| transitions::apply_send(rfq, Utc::now()))
    }

    async fn record_quote(
        &self,
        id: &RfqId,
        lines: &[QuoteLineInput],
        notes: &str,
    ) -> Result<Rfq, WorkflowError> {
        self.update(id, |rfq| transitions::apply_quote(rfq, lines, notes))
    }

    async fn decide_rfq(
        &self,
        id: &RfqId,
        action: ApprovalAction,
        comments: &str,
        actor_id: &str,
    ) -> Result<Rfq, WorkflowError> {
        self.update(id, |rfq| {
            transitions::apply_decision(rfq, action, comments, actor_id, Utc::now())
        })
    }

    async fn resubmit_rfq(&self, id: &RfqId) -> Result<Rfq, WorkflowError> {
        self.update(id, |rfq| transitions::apply_resubmit(rfq, Utc::now()))
    }

    async fn create_po_from_rfq(&self, id: &RfqId) -> Result<PoId, WorkflowError> {
        let mut store = self.store.lock().expect("store poisoned");
        if let Some(existing) = store.purchase_orders.iter().find(|po| &po.rfq_id == id) {
            return Err(WorkflowError::DuplicatePo {
                rfq_id: id.clone(),
                po_id: existing.po_id.clone(),
            });
        }
        let slot = store
            .rfqs
            .iter_mut()
            .find(|rfq| &rfq.id == id)
            .ok_or_else(|| {
                WorkflowError::transport("lookup", anyhow::anyhow!("unknown RFQ {id}"))
            })?;

        let po_id = PoId(format!("PO-{}", Uuid::new_v4()));
        let po = derive_purchase_order(slot, po_id.clone(), Utc::now())?;
        *slot = transitions::apply_po_created(slot)?;
        store.purchase_orders.push(po);
        Ok(po_id)
    }

    async fn check_existing_po(&self, rfq_id: &RfqId) -> Result<Option<PoId>, WorkflowError> {
        let store = self.store.lock().expect("store poisoned");
        Ok(store
            .purchase_orders
            .iter()
            .find(|po| &po.rfq_id == rfq_id)
            .map(|po| po.po_id.clone()))
    }
}

/// Captures emitted events for assertion in tests.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn emit(&self, event: NotificationEvent) {
        self.events.lock().expect("sink poisoned").push(event);
    }
}
