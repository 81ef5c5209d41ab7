//! Rule registry and the dispatch entrypoint.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, warn};

use super::error::DispatchError;
use super::processor::{RuleOutcome, RuleProcessor};
use crate::finance::context::FinanceContext;
use crate::finance::entry::GlEntry;
use crate::smartcode::SmartCode;
use crate::transaction::types::{TransactionHeader, TransactionLine};

/// Result of dispatching one transaction.
///
/// Callers must check `errors` before trusting `entries`; an unregistered
/// domain or a malformed code is a value here, never an exception and never
/// a silent no-op success.
#[derive(Debug, Default)]
pub struct DispatchResult {
    /// Derived GL entries.
    pub entries: Vec<GlEntry>,
    /// Errors encountered during dispatch or processing.
    pub errors: Vec<DispatchError>,
}

impl DispatchResult {
    /// Returns true if dispatch produced no errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn from_error(error: DispatchError) -> Self {
        Self {
            entries: Vec::new(),
            errors: vec![error],
        }
    }
}

impl From<RuleOutcome> for DispatchResult {
    fn from(outcome: RuleOutcome) -> Self {
        Self {
            entries: outcome.entries,
            errors: outcome.errors,
        }
    }
}

/// Registry mapping business domains to rule processors.
///
/// An explicit object, constructed once at startup and passed by reference
/// into dispatch - there is no hidden process-wide map, so tests can build
/// isolated registries. Registration takes `&mut self`; during steady-state
/// request handling the registry is shared immutably and mutation is simply
/// unavailable.
#[derive(Default)]
pub struct RuleRegistry {
    processors: HashMap<String, Box<dyn RuleProcessor>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a processor for a domain. Last writer wins.
    ///
    /// Domain matching is case-sensitive as authored.
    pub fn register(&mut self, domain: impl Into<String>, processor: Box<dyn RuleProcessor>) {
        let domain = domain.into();
        if self.processors.insert(domain.clone(), processor).is_some() {
            warn!(domain = %domain, "replacing previously registered rule processor");
        }
    }

    /// Returns true if a processor is registered for the domain.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.processors.contains_key(domain)
    }

    /// Lists registered domains, sorted, each exactly once.
    #[must_use]
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.processors.keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Dispatches one transaction to its domain's processor.
    ///
    /// The header's smart code is parsed first (failing closed on a
    /// malformed code), the domain segment selects the processor, and an
    /// escaped panic is converted into a single `ProcessorFault` with the
    /// transaction's GL output discarded. This entrypoint never panics.
    #[must_use]
    pub fn dispatch(
        &self,
        header: &TransactionHeader,
        lines: &[TransactionLine],
        context: &FinanceContext,
    ) -> DispatchResult {
        let Ok(code) = SmartCode::parse(&header.smart_code) else {
            return DispatchResult::from_error(DispatchError::MalformedCode {
                code: header.smart_code.clone(),
            });
        };

        let domain = code.domain();
        let Some(processor) = self.processors.get(domain) else {
            return DispatchResult::from_error(DispatchError::UnregisteredDomain {
                domain: domain.to_string(),
            });
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            processor.process(header, lines, context)
        }));

        match outcome {
            Ok(outcome) => {
                debug!(
                    domain = %domain,
                    entries = outcome.entries.len(),
                    errors = outcome.errors.len(),
                    "dispatched transaction"
                );
                outcome.into()
            }
            Err(payload) => {
                let detail = panic_detail(payload.as_ref());
                warn!(domain = %domain, detail = %detail, "rule processor faulted");
                DispatchResult::from_error(DispatchError::ProcessorFault {
                    domain: domain.to_string(),
                    detail,
                })
            }
        }
    }
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
