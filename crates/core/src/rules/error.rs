//! Dispatch and rule-processing error taxonomy.

use thiserror::Error;

use crate::finance::context::AccountRole;

/// Errors surfaced through a dispatch result.
///
/// Dispatch never throws; callers must inspect the result's error list
/// before trusting its entries. Line-scoped variants leave sibling lines
/// unaffected; `ProcessorFault` discards the whole transaction's output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The smart code has fewer than the minimum number of segments.
    /// Rejected before any dispatch is attempted.
    #[error("smart code '{code}' is malformed: expected at least 3 dot-separated segments")]
    MalformedCode {
        /// The offending code.
        code: String,
    },

    /// The code's domain has no registered processor.
    #[error("no rules registered for domain {domain}")]
    UnregisteredDomain {
        /// The unmatched domain segment.
        domain: String,
    },

    /// The processor recognizes the domain but not this transaction variant.
    #[error("unsupported transaction code '{code}'")]
    UnsupportedTransaction {
        /// The unhandled header code.
        code: String,
    },

    /// The processor recognizes the domain but not this line variant.
    #[error("line {line_number}: unsupported line code '{code}'")]
    UnsupportedLine {
        /// The line number within the transaction.
        line_number: u32,
        /// The unhandled line code.
        code: String,
    },

    /// A required domain input is absent from the line payload.
    ///
    /// Missing market inputs are hard failures; a guessed substitute could
    /// materially misstate a posting.
    #[error("line {line_number}: required field '{field}' is missing")]
    MissingField {
        /// The line number within the transaction.
        line_number: u32,
        /// The missing payload field.
        field: &'static str,
    },

    /// No GL account is mapped to a ledger role the processor posts to.
    #[error("no GL account mapped for role {role:?}")]
    MissingAccount {
        /// The unmapped role.
        role: AccountRole,
    },

    /// A supplied value is out of range or otherwise unusable.
    #[error("line {line_number}: {detail}")]
    InvalidValue {
        /// The line number within the transaction.
        line_number: u32,
        /// What was wrong.
        detail: String,
    },

    /// A panic escaped the processor and was caught at the dispatch
    /// boundary. The transaction's GL output is discarded.
    #[error("rule processor for domain {domain} faulted: {detail}")]
    ProcessorFault {
        /// The domain whose processor faulted.
        domain: String,
        /// Panic payload, when printable.
        detail: String,
    },
}

impl DispatchError {
    /// Returns the error code for structured responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedCode { .. } => "MALFORMED_CODE",
            Self::UnregisteredDomain { .. } => "UNREGISTERED_DOMAIN",
            Self::UnsupportedTransaction { .. } => "UNSUPPORTED_TRANSACTION",
            Self::UnsupportedLine { .. } => "UNSUPPORTED_LINE",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::MissingAccount { .. } => "MISSING_ACCOUNT",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::ProcessorFault { .. } => "PROCESSOR_FAULT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_domain_message() {
        let err = DispatchError::UnregisteredDomain {
            domain: "TEXTILE".to_string(),
        };
        assert_eq!(err.to_string(), "no rules registered for domain TEXTILE");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DispatchError::MalformedCode {
                code: "X.Y".to_string()
            }
            .error_code(),
            "MALFORMED_CODE"
        );
        assert_eq!(
            DispatchError::MissingField {
                line_number: 1,
                field: "rate_per_gram"
            }
            .error_code(),
            "MISSING_FIELD"
        );
        assert_eq!(
            DispatchError::ProcessorFault {
                domain: "JEWELRY".to_string(),
                detail: "boom".to_string()
            }
            .error_code(),
            "PROCESSOR_FAULT"
        );
    }
}
