//! The per-domain rule processor contract.

use super::error::DispatchError;
use crate::finance::context::FinanceContext;
use crate::finance::entry::GlEntry;
use crate::transaction::types::{TransactionHeader, TransactionLine};

/// Output of one rule-processor run.
///
/// Failure is part of the signature: a processor reports problems by
/// appending to `errors`, never by panicking. Line-scoped errors coexist
/// with entries for the lines that did match.
#[derive(Debug, Default)]
pub struct RuleOutcome {
    /// Derived GL entries.
    pub entries: Vec<GlEntry>,
    /// Errors encountered while processing.
    pub errors: Vec<DispatchError>,
}

impl RuleOutcome {
    /// Creates an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an outcome holding a single error and no entries.
    #[must_use]
    pub fn from_error(error: DispatchError) -> Self {
        Self {
            entries: Vec::new(),
            errors: vec![error],
        }
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A pure function turning one domain's transactions into GL entries.
///
/// Implementations hold no mutable state, perform no I/O, and persist
/// nothing, so concurrent dispatch of different transactions is inherently
/// safe. Lines must be walked exactly once, strictly in the order supplied -
/// later lines may depend on running totals accumulated by earlier ones.
pub trait RuleProcessor: Send + Sync {
    /// Derives GL entries for one transaction.
    fn process(
        &self,
        header: &TransactionHeader,
        lines: &[TransactionLine],
        context: &FinanceContext,
    ) -> RuleOutcome;
}
