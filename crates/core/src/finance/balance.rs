//! Balance validation for derived GL entry sets.

use rust_decimal::Decimal;

use super::entry::GlEntry;

/// Result of a balance check over one transaction's entry set.
#[derive(Debug, Clone)]
pub struct BalanceCheck {
    /// Sum of the debit column.
    pub debits: Decimal,
    /// Sum of the credit column.
    pub credits: Decimal,
    /// `debits - credits` (signed).
    pub difference: Decimal,
    /// Whether the absolute difference is within the tolerance.
    pub is_balanced: bool,
}

/// Validates debit/credit symmetry of a GL entry set.
///
/// The debit and credit columns are summed independently and the absolute
/// difference compared against `tolerance` (typically one minor currency
/// unit from the finance context). Any caller must treat an unbalanced
/// result as "do not post".
#[must_use]
pub fn validate_balance(entries: &[GlEntry], tolerance: Decimal) -> BalanceCheck {
    let debits: Decimal = entries.iter().map(|e| e.debit).sum();
    let credits: Decimal = entries.iter().map(|e| e.credit).sum();
    let difference = debits - credits;

    BalanceCheck {
        debits,
        credits,
        difference,
        is_balanced: difference.abs() <= tolerance,
    }
}
