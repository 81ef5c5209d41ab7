//! GL entry domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::context::GlAccount;

/// One side of a double-entry ledger posting.
///
/// Entries are transient: this core derives them, callers post them. Exactly
/// one of `debit` / `credit` is non-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlEntry {
    /// GL account code.
    pub account_code: String,
    /// GL account name.
    pub account_name: String,
    /// Debit amount (zero if this is a credit entry).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit entry).
    pub credit: Decimal,
    /// The smart code that produced this entry.
    pub smart_code: String,
    /// The originating line number, when the entry maps to one line.
    pub line_number: Option<u32>,
    /// Optional memo.
    pub memo: Option<String>,
}

impl GlEntry {
    /// Creates a debit entry.
    #[must_use]
    pub fn debit(
        account: &GlAccount,
        amount: Decimal,
        smart_code: &str,
        line_number: Option<u32>,
    ) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit: amount,
            credit: Decimal::ZERO,
            smart_code: smart_code.to_string(),
            line_number,
            memo: None,
        }
    }

    /// Creates a credit entry.
    #[must_use]
    pub fn credit(
        account: &GlAccount,
        amount: Decimal,
        smart_code: &str,
        line_number: Option<u32>,
    ) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit: Decimal::ZERO,
            credit: amount,
            smart_code: smart_code.to_string(),
            line_number,
            memo: None,
        }
    }

    /// Attaches a memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}
