//! Full workflow scenarios through the async engine and the in-memory
//! backend: send/quote lifecycle, duplicate-PO guarding, and rejection
//! validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use rfqflow::api::{InMemoryRfqApi, RfqApi};
use rfqflow::model::{QuoteLineInput, Rfq, RfqId, RfqItem};
use rfqflow::workflow::{RfqStatus, WorkflowEngine, WorkflowError};

fn seeded_api() -> Arc<InMemoryRfqApi> {
    let api = InMemoryRfqApi::new();
    api.seed(Rfq::draft(
        "R1",
        "RFQ-2025-001",
        "V-9",
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        vec![RfqItem {
            product_id: "P1".to_string(),
            quantity: 10,
            unit: "pcs".to_string(),
        }],
    ));
    Arc::new(api)
}

fn quote_lines() -> Vec<QuoteLineInput> {
    vec![QuoteLineInput {
        product_id: "P1".to_string(),
        quantity: 10,
        unit_price: Decimal::new(500, 2),
        expected_delivery_date: NaiveDate::from_ymd_opt(2025, 1, 10),
    }]
}

async fn fetch_one(api: &InMemoryRfqApi) -> Rfq {
    api.fetch_rfq_collection()
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap()
}

#[tokio::test]
async fn draft_to_received_with_exact_vendor_price() {
    let api = seeded_api();
    let engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let rfq = fetch_one(&api).await;

    let sent = engine.send(&rfq).await.unwrap();
    assert_eq!(sent.status, RfqStatus::Sent);
    assert!(sent.sent_date.is_some());

    let quoted = engine.record_quote(&sent, &quote_lines(), "").await.unwrap();
    assert_eq!(quoted.status, RfqStatus::Received);
    assert_eq!(
        quoted.vendor_quote.as_ref().unwrap().vendor_price,
        Decimal::new(5000, 2)
    );

    // The backend holds the post-transition entity as well.
    assert_eq!(fetch_one(&api).await.status, RfqStatus::Received);
}

#[tokio::test]
async fn second_po_creation_reports_the_first_po_id() {
    let api = seeded_api();
    let engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let rfq = fetch_one(&api).await;

    let sent = engine.send(&rfq).await.unwrap();
    let quoted = engine.record_quote(&sent, &quote_lines(), "").await.unwrap();
    let approved = engine.approve(&quoted, "looks good", "mgr-1").await.unwrap();
    assert_eq!(approved.status, RfqStatus::Approved);
    assert!(approved.approved_at.is_some());

    let po_id = engine.create_purchase_order(&approved).await.unwrap();
    let po = api.purchase_order(&po_id).expect("PO persisted");
    assert_eq!(po.total_amount, Decimal::new(5000, 2));
    assert_eq!(po.rfq_id, RfqId::from("R1"));

    let err = engine.create_purchase_order(&approved).await.unwrap_err();
    match err {
        WorkflowError::DuplicatePo {
            po_id: existing, ..
        } => assert_eq!(existing, po_id),
        other => panic!("expected DuplicatePo, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_guard_holds_even_without_the_memoized_entry() {
    let api = seeded_api();
    let engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let rfq = fetch_one(&api).await;

    let sent = engine.send(&rfq).await.unwrap();
    let quoted = engine.record_quote(&sent, &quote_lines(), "").await.unwrap();
    let approved = engine.approve(&quoted, "ok", "mgr-1").await.unwrap();
    let po_id = engine.create_purchase_order(&approved).await.unwrap();

    // A second engine has an empty guard cache and must fall back to the
    // upstream existence check.
    let second_engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let err = second_engine
        .create_purchase_order(&approved)
        .await
        .unwrap_err();
    assert!(
        matches!(err, WorkflowError::DuplicatePo { po_id: ref existing, .. } if existing == &po_id)
    );
}

#[tokio::test]
async fn rejection_requires_a_reason_and_records_one() {
    let api = seeded_api();
    let engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let rfq = fetch_one(&api).await;

    let sent = engine.send(&rfq).await.unwrap();
    let quoted = engine.record_quote(&sent, &quote_lines(), "").await.unwrap();

    let err = engine.reject(&quoted, "", "mgr-1").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "comments"));
    // Local and backend state both untouched by the failed call.
    assert_eq!(fetch_one(&api).await.status, RfqStatus::Received);

    let rejected = engine.reject(&quoted, "price too high", "mgr-1").await.unwrap();
    assert_eq!(rejected.status, RfqStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("price too high"));
    assert!(rejected.rejected_at.is_some());

    // Re-entrant edge: resubmission goes back out to the vendor.
    let resubmitted = engine.resubmit(&rejected).await.unwrap();
    assert_eq!(resubmitted.status, RfqStatus::Sent);
    assert!(resubmitted.vendor_quote.is_none());
}

#[tokio::test]
async fn create_po_refuses_non_approved_states() {
    let api = seeded_api();
    let engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let rfq = fetch_one(&api).await;

    let err = engine.create_purchase_order(&rfq).await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    assert!(api
        .check_existing_po(&RfqId::from("R1"))
        .await
        .unwrap()
        .is_none());
}
