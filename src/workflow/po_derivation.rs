//! Draft purchase-order derivation from an approved RFQ.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::model::{PoId, PoLine, PoStatus, PurchaseOrder, Rfq};
use crate::workflow::errors::WorkflowError;
use crate::workflow::status::{RfqAction, RfqStatus};

/// Compute a draft purchase order from `rfq`'s vendor quote.
///
/// Requires the RFQ to be `Approved` with a quote attached. Each RFQ item is
/// priced from its quote line; a missing line should be unreachable given the
/// coverage invariant but is still checked and reported rather than assumed.
/// The result is not persisted here; the caller issues the creation request.
pub fn derive_purchase_order(
    rfq: &Rfq,
    po_id: PoId,
    now: DateTime<Utc>,
) -> Result<PurchaseOrder, WorkflowError> {
    if rfq.status != RfqStatus::Approved {
        return Err(WorkflowError::InvalidTransition {
            action: RfqAction::CreatePo,
            status: rfq.status,
        });
    }
    let quote = rfq.vendor_quote.as_ref().ok_or_else(|| {
        WorkflowError::validation("vendor_quote", "approved RFQ is missing its vendor quote")
    })?;

    let mut lines = Vec::with_capacity(rfq.items.len());
    let mut total_amount = Decimal::ZERO;
    for item in &rfq.items {
        let quote_line = quote.line_for(&item.product_id).ok_or_else(|| {
            WorkflowError::MissingQuoteLine {
                product_id: item.product_id.clone(),
            }
        })?;
        let line_total = quote_line.line_total();
        total_amount += line_total;
        lines.push(PoLine {
            product_id: quote_line.product_id.clone(),
            quantity: quote_line.quantity,
            unit: quote_line.unit.clone(),
            unit_price: quote_line.unit_price,
            line_total,
            expected_delivery_date: quote_line.expected_delivery_date,
        });
    }

    Ok(PurchaseOrder {
        po_id,
        rfq_id: rfq.id.clone(),
        lines,
        total_amount,
        status: PoStatus::Draft,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::model::{ApprovalAction, QuoteLineInput, RfqItem};
    use crate::workflow::transitions::{apply_decision, apply_quote, apply_send};

    fn approved_rfq() -> Rfq {
        let rfq = Rfq::draft(
            "R1",
            "RFQ-2025-001",
            "V-9",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            vec![
                RfqItem {
                    product_id: "P1".to_string(),
                    quantity: 10,
                    unit: "pcs".to_string(),
                },
                RfqItem {
                    product_id: "P2".to_string(),
                    quantity: 4,
                    unit: "box".to_string(),
                },
            ],
        );
        let sent = apply_send(&rfq, Utc::now()).unwrap();
        let quoted = apply_quote(
            &sent,
            &[
                QuoteLineInput {
                    product_id: "P1".to_string(),
                    quantity: 10,
                    unit_price: Decimal::new(500, 2),
                    expected_delivery_date: NaiveDate::from_ymd_opt(2025, 1, 10),
                },
                QuoteLineInput {
                    product_id: "P2".to_string(),
                    quantity: 4,
                    unit_price: Decimal::new(1250, 2),
                    expected_delivery_date: NaiveDate::from_ymd_opt(2025, 1, 12),
                },
            ],
            "",
        )
        .unwrap();
        apply_decision(&quoted, ApprovalAction::Approve, "looks good", "mgr-1", Utc::now()).unwrap()
    }

    #[test]
    fn po_total_matches_quote_total_exactly() {
        let rfq = approved_rfq();
        let po = derive_purchase_order(&rfq, PoId::from("PO-1"), Utc::now()).unwrap();
        // 10 * 5.00 + 4 * 12.50 = 100.00
        assert_eq!(po.total_amount, Decimal::new(10000, 2));
        assert_eq!(
            po.total_amount,
            rfq.vendor_quote.as_ref().unwrap().vendor_price
        );
        assert_eq!(po.status, PoStatus::Draft);
        assert_eq!(po.rfq_id, rfq.id);
        assert_eq!(po.lines.len(), 2);
    }

    #[test]
    fn derivation_requires_approved_status() {
        let rfq = Rfq::draft(
            "R2",
            "RFQ-2025-002",
            "V-9",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            vec![],
        );
        let err = derive_purchase_order(&rfq, PoId::from("PO-2"), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[test]
    fn missing_quote_line_is_reported_not_assumed() {
        let mut rfq = approved_rfq();
        // Violate the coverage invariant on purpose.
        rfq.vendor_quote.as_mut().unwrap().lines.retain(|l| l.product_id != "P2");
        let err = derive_purchase_order(&rfq, PoId::from("PO-3"), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::MissingQuoteLine { ref product_id } if product_id == "P2"));
    }
}
