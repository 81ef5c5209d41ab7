//! Compensating (reversal) transactions.
//!
//! Posted headers are never edited in place; a correction is a new
//! transaction that negates the original amounts and links back to it.

use serde_json::json;

use super::error::TransactionError;
use super::types::{
    NewTransaction, NewTransactionLine, TransactionHeader, TransactionLine, TransactionStatus,
};

/// Builds a compensating transaction for a posted header.
///
/// Every amount is negated (total, line amounts, quantities); smart codes
/// and line numbers are preserved so the reversal dispatches through the
/// same rules as the original. The new header's metadata records the
/// original transaction id and the reason.
///
/// # Errors
///
/// Returns [`TransactionError::NotPosted`] unless the header is posted.
pub fn build_reversal(
    header: &TransactionHeader,
    lines: &[TransactionLine],
    reason: &str,
) -> Result<(NewTransaction, Vec<NewTransactionLine>), TransactionError> {
    if header.status != TransactionStatus::Posted {
        return Err(TransactionError::NotPosted);
    }

    let reversal_header = NewTransaction {
        transaction_type: header.transaction_type.clone(),
        smart_code: header.smart_code.clone(),
        transaction_date: header.transaction_date,
        total_amount: -header.total_amount,
        reference_entity: header.reference_entity,
        metadata: json!({
            "reversal_of": header.id,
            "reason": reason,
            "original_metadata": header.metadata,
        }),
    };

    let reversal_lines = lines
        .iter()
        .map(|line| NewTransactionLine {
            line_number: line.line_number,
            entity_id: line.entity_id,
            quantity: -line.quantity,
            unit_amount: line.unit_amount,
            line_amount: -line.line_amount,
            smart_code: line.smart_code.clone(),
            payload: line.payload.clone(),
        })
        .collect();

    Ok((reversal_header, reversal_lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::types::TransactionStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use tessera_shared::types::{OrganizationId, TransactionId, TransactionLineId};

    fn posted_header() -> TransactionHeader {
        let now = Utc::now();
        TransactionHeader {
            id: TransactionId::new(),
            organization_id: OrganizationId::new(),
            transaction_type: "pos_sale".to_string(),
            smart_code: "TESSERA.JEWELRY.POS.SALE.TXN.v1".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            total_amount: dec!(52358.33),
            status: TransactionStatus::Posted,
            reference_entity: None,
            metadata: serde_json::json!({"place_of_supply": "KA"}),
            created_at: now,
            updated_at: now,
        }
    }

    fn item_line(transaction_id: TransactionId) -> TransactionLine {
        TransactionLine {
            id: TransactionLineId::new(),
            transaction_id,
            line_number: 1,
            entity_id: None,
            quantity: dec!(1),
            unit_amount: dec!(50833.33),
            line_amount: dec!(50833.33),
            smart_code: "TESSERA.JEWELRY.POS.LINE.ITEM.v1".to_string(),
            payload: serde_json::json!({"net_weight": "10"}),
        }
    }

    #[test]
    fn test_reversal_negates_amounts() {
        let header = posted_header();
        let lines = vec![item_line(header.id)];

        let (reversal, reversal_lines) = build_reversal(&header, &lines, "pricing error").unwrap();

        assert_eq!(reversal.total_amount, dec!(-52358.33));
        assert_eq!(reversal.smart_code, header.smart_code);
        assert_eq!(reversal_lines.len(), 1);
        assert_eq!(reversal_lines[0].line_amount, dec!(-50833.33));
        assert_eq!(reversal_lines[0].quantity, dec!(-1));
        assert_eq!(reversal_lines[0].line_number, 1);
    }

    #[test]
    fn test_reversal_links_to_original() {
        let header = posted_header();
        let (reversal, _) = build_reversal(&header, &[], "duplicate").unwrap();

        assert_eq!(
            reversal.metadata["reversal_of"],
            serde_json::json!(header.id)
        );
        assert_eq!(reversal.metadata["reason"], "duplicate");
    }

    #[test]
    fn test_reversal_requires_posted() {
        let mut header = posted_header();
        header.status = TransactionStatus::Confirmed;
        assert!(matches!(
            build_reversal(&header, &[], "nope"),
            Err(TransactionError::NotPosted)
        ));

        header.status = TransactionStatus::Cancelled;
        assert!(matches!(
            build_reversal(&header, &[], "nope"),
            Err(TransactionError::NotPosted)
        ));
    }

    #[test]
    fn test_reversal_totals_reconcile() {
        let header = posted_header();
        let lines = vec![item_line(header.id)];
        let (reversal, reversal_lines) = build_reversal(&header, &lines, "error").unwrap();

        let line_total: rust_decimal::Decimal =
            reversal_lines.iter().map(|l| l.line_amount).sum();
        // Single-line example: negated line matches the negated item amount.
        assert_eq!(line_total, dec!(-50833.33));
        assert_eq!(reversal.total_amount, -header.total_amount);
    }
}
