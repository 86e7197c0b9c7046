//! Pure transition functions over the RFQ entity.
//!
//! Each function validates one action against the transition table and
//! returns the post-transition entity or an error, leaving the input
//! untouched. Given the same (state, action, payload) the result is always
//! the same state or the same error kind; the only time-dependent field is
//! the timestamp, which callers pass in explicitly.

use chrono::{DateTime, Utc};

use crate::model::{Approval, ApprovalAction, QuoteLine, QuoteLineInput, Rfq, VendorQuote};
use crate::workflow::errors::WorkflowError;
use crate::workflow::status::{is_legal, RfqAction, RfqStatus};

fn guard(rfq: &Rfq, action: RfqAction) -> Result<(), WorkflowError> {
    if is_legal(rfq.status, action) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidTransition {
            action,
            status: rfq.status,
        })
    }
}

/// `Draft -> Sent`. Stamps `sent_date` on first send only.
pub fn apply_send(rfq: &Rfq, now: DateTime<Utc>) -> Result<Rfq, WorkflowError> {
    guard(rfq, RfqAction::Send)?;
    let mut next = rfq.clone();
    next.status = RfqStatus::Sent;
    next.sent_date.get_or_insert(now);
    Ok(next)
}

/// `Sent -> Received`. Validates line coverage and pricing, attaches the
/// vendor quote, and computes the derived `vendor_price`.
pub fn apply_quote(
    rfq: &Rfq,
    lines: &[QuoteLineInput],
    notes: &str,
) -> Result<Rfq, WorkflowError> {
    guard(rfq, RfqAction::RecordQuote)?;

    let validated = validate_quote_lines(rfq, lines)?;
    let vendor_price = VendorQuote::total_of(&validated);

    let mut next = rfq.clone();
    next.status = RfqStatus::Received;
    next.vendor_quote = Some(VendorQuote {
        lines: validated,
        vendor_notes: notes.to_string(),
        vendor_price,
    });
    Ok(next)
}

/// `Received -> Approved | Rejected`. Appends the decision to the approval
/// history and stamps the matching timestamp. Reject requires a reason.
pub fn apply_decision(
    rfq: &Rfq,
    action: ApprovalAction,
    comments: &str,
    actor_id: &str,
    now: DateTime<Utc>,
) -> Result<Rfq, WorkflowError> {
    let rfq_action = match action {
        ApprovalAction::Approve => RfqAction::Approve,
        ApprovalAction::Reject => RfqAction::Reject,
    };
    guard(rfq, rfq_action)?;

    if action == ApprovalAction::Reject && comments.trim().is_empty() {
        return Err(WorkflowError::validation(
            "comments",
            "a rejection must carry a non-empty reason",
        ));
    }

    let mut next = rfq.clone();
    next.approvals.push(Approval {
        action,
        comments: comments.to_string(),
        timestamp: now,
        actor_id: actor_id.to_string(),
    });
    match action {
        ApprovalAction::Approve => {
            next.status = RfqStatus::Approved;
            next.approved_at.get_or_insert(now);
        }
        ApprovalAction::Reject => {
            next.status = RfqStatus::Rejected;
            next.rejected_at.get_or_insert(now);
            next.rejection_reason = Some(comments.to_string());
        }
    }
    Ok(next)
}

/// `Rejected -> Sent`, the re-entrant edge. The quote and rejection reason
/// are cleared so the entity satisfies the pre-`Received` invariant again;
/// the approval history is kept.
pub fn apply_resubmit(rfq: &Rfq, now: DateTime<Utc>) -> Result<Rfq, WorkflowError> {
    guard(rfq, RfqAction::Resubmit)?;
    let mut next = rfq.clone();
    next.status = RfqStatus::Sent;
    next.vendor_quote = None;
    next.rejection_reason = None;
    next.sent_date.get_or_insert(now);
    Ok(next)
}

/// `Approved -> PoCreated`, applied after the purchase order exists.
pub fn apply_po_created(rfq: &Rfq) -> Result<Rfq, WorkflowError> {
    guard(rfq, RfqAction::CreatePo)?;
    let mut next = rfq.clone();
    next.status = RfqStatus::PoCreated;
    Ok(next)
}

/// Check the coverage invariant both ways and per-line field validity,
/// producing validated lines with the unit copied from the matching item.
fn validate_quote_lines(
    rfq: &Rfq,
    lines: &[QuoteLineInput],
) -> Result<Vec<QuoteLine>, WorkflowError> {
    for line in lines {
        if rfq.item(&line.product_id).is_none() {
            return Err(WorkflowError::validation(
                "product_id",
                format!(
                    "quote line references product {} absent from the RFQ",
                    line.product_id
                ),
            ));
        }
    }

    let mut validated = Vec::with_capacity(rfq.items.len());
    for item in &rfq.items {
        let line = lines
            .iter()
            .find(|line| line.product_id == item.product_id)
            .ok_or_else(|| {
                WorkflowError::validation(
                    "quote_lines",
                    format!("no quote line for product {}", item.product_id),
                )
            })?;

        if line.unit_price <= rust_decimal::Decimal::ZERO {
            return Err(WorkflowError::validation(
                "unit_price",
                format!("unit price for {} must be greater than zero", item.product_id),
            ));
        }
        let expected_delivery_date = line.expected_delivery_date.ok_or_else(|| {
            WorkflowError::validation(
                "expected_delivery_date",
                format!("missing expected delivery date for {}", item.product_id),
            )
        })?;
        if line.quantity == 0 {
            return Err(WorkflowError::validation(
                "quantity",
                format!("quoted quantity for {} must be positive", item.product_id),
            ));
        }

        validated.push(QuoteLine {
            product_id: item.product_id.clone(),
            quantity: line.quantity,
            unit: item.unit.clone(),
            unit_price: line.unit_price,
            expected_delivery_date,
        });
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::model::RfqItem;

    fn sample_rfq() -> Rfq {
        Rfq::draft(
            "R1",
            "RFQ-2025-001",
            "V-9",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            vec![RfqItem {
                product_id: "P1".to_string(),
                quantity: 10,
                unit: "pcs".to_string(),
            }],
        )
    }

    fn quote_line(price_cents: i64) -> QuoteLineInput {
        QuoteLineInput {
            product_id: "P1".to_string(),
            quantity: 10,
            unit_price: Decimal::new(price_cents, 2),
            expected_delivery_date: NaiveDate::from_ymd_opt(2025, 1, 10),
        }
    }

    #[test]
    fn send_stamps_sent_date_once() {
        let now = Utc::now();
        let sent = apply_send(&sample_rfq(), now).unwrap();
        assert_eq!(sent.status, RfqStatus::Sent);
        assert_eq!(sent.sent_date, Some(now));

        // A later resubmit cycle must not restamp it.
        let quoted = apply_quote(&sent, &[quote_line(500)], "").unwrap();
        let rejected =
            apply_decision(&quoted, ApprovalAction::Reject, "too pricey", "mgr-1", now).unwrap();
        let resubmitted = apply_resubmit(&rejected, Utc::now()).unwrap();
        assert_eq!(resubmitted.sent_date, Some(now));
    }

    #[test]
    fn send_from_sent_is_rejected_and_input_untouched() {
        let now = Utc::now();
        let sent = apply_send(&sample_rfq(), now).unwrap();
        let err = apply_send(&sent, now).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        assert_eq!(sent.status, RfqStatus::Sent);
    }

    #[test]
    fn quote_computes_exact_vendor_price() {
        let sent = apply_send(&sample_rfq(), Utc::now()).unwrap();
        let quoted = apply_quote(&sent, &[quote_line(500)], "ships early").unwrap();
        assert_eq!(quoted.status, RfqStatus::Received);
        let quote = quoted.vendor_quote.expect("quote attached");
        assert_eq!(quote.vendor_price, Decimal::new(5000, 2));
        assert_eq!(quote.vendor_notes, "ships early");
    }

    #[test]
    fn quote_rejects_zero_price_and_missing_date() {
        let sent = apply_send(&sample_rfq(), Utc::now()).unwrap();

        let err = apply_quote(&sent, &[quote_line(0)], "").unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "unit_price"));

        let mut dateless = quote_line(500);
        dateless.expected_delivery_date = None;
        let err = apply_quote(&sent, &[dateless], "").unwrap_err();
        assert!(
            matches!(err, WorkflowError::Validation { ref field, .. } if field == "expected_delivery_date")
        );
    }

    #[test]
    fn quote_rejects_uncovered_items_and_unknown_products() {
        let sent = apply_send(&sample_rfq(), Utc::now()).unwrap();

        let err = apply_quote(&sent, &[], "").unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "quote_lines"));

        let mut foreign = quote_line(500);
        foreign.product_id = "P-unknown".to_string();
        let err = apply_quote(&sent, &[foreign], "").unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "product_id"));
    }

    #[test]
    fn reject_requires_a_reason() {
        let sent = apply_send(&sample_rfq(), Utc::now()).unwrap();
        let quoted = apply_quote(&sent, &[quote_line(500)], "").unwrap();

        let err =
            apply_decision(&quoted, ApprovalAction::Reject, "  ", "mgr-1", Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "comments"));

        let rejected =
            apply_decision(&quoted, ApprovalAction::Reject, "price too high", "mgr-1", Utc::now())
                .unwrap();
        assert_eq!(rejected.status, RfqStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("price too high"));
        assert_eq!(rejected.approvals.len(), 1);
    }

    #[test]
    fn repeated_decisions_yield_identical_results() {
        let sent = apply_send(&sample_rfq(), Utc::now()).unwrap();
        let quoted = apply_quote(&sent, &[quote_line(500)], "").unwrap();
        let now = Utc::now();

        let a = apply_decision(&quoted, ApprovalAction::Approve, "ok", "mgr-1", now).unwrap();
        let b = apply_decision(&quoted, ApprovalAction::Approve, "ok", "mgr-1", now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn resubmit_clears_quote_and_reason() {
        let sent = apply_send(&sample_rfq(), Utc::now()).unwrap();
        let quoted = apply_quote(&sent, &[quote_line(500)], "").unwrap();
        let rejected =
            apply_decision(&quoted, ApprovalAction::Reject, "no", "mgr-1", Utc::now()).unwrap();

        let resubmitted = apply_resubmit(&rejected, Utc::now()).unwrap();
        assert_eq!(resubmitted.status, RfqStatus::Sent);
        assert!(resubmitted.vendor_quote.is_none());
        assert!(resubmitted.rejection_reason.is_none());
        assert_eq!(resubmitted.approvals.len(), 1);
    }
}
