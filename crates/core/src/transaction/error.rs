//! Transaction error types.

use tessera_shared::types::TransactionId;
use thiserror::Error;

use super::types::TransactionStatus;
use crate::smartcode::SmartCodeError;

/// Errors that can occur during transaction operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Transaction type is required and must be non-blank.
    #[error("Transaction type is required")]
    MissingType,

    /// The smart code attached to the record is malformed.
    #[error(transparent)]
    MalformedSmartCode(#[from] SmartCodeError),

    /// Transaction not found within the organization.
    #[error("Transaction not found in organization: {0}")]
    TransactionNotFound(TransactionId),

    /// A line with this number already exists on the header.
    #[error("Line number {line_number} already exists on this transaction")]
    DuplicateLineNumber {
        /// The duplicated line number.
        line_number: u32,
    },

    /// Lines may only be added while the header is in draft.
    #[error("Cannot modify transaction in {0:?} status")]
    NotEditable(TransactionStatus),

    /// Illegal status transition.
    #[error("Illegal status transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: TransactionStatus,
        /// Requested status.
        to: TransactionStatus,
    },

    /// Reversals are only built from posted transactions.
    #[error("Only posted transactions can be reversed")]
    NotPosted,

    /// Storage adapter error.
    #[error(transparent)]
    Storage(#[from] tessera_shared::AppError),
}

impl TransactionError {
    /// Returns the error code for structured responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingType => "MISSING_TYPE",
            Self::MalformedSmartCode(_) => "MALFORMED_SMART_CODE",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::DuplicateLineNumber { .. } => "DUPLICATE_LINE_NUMBER",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotPosted => "NOT_POSTED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TransactionError::DuplicateLineNumber { line_number: 2 }.error_code(),
            "DUPLICATE_LINE_NUMBER"
        );
        assert_eq!(
            TransactionError::InvalidTransition {
                from: TransactionStatus::Posted,
                to: TransactionStatus::Draft,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = TransactionError::InvalidTransition {
            from: TransactionStatus::Draft,
            to: TransactionStatus::Posted,
        };
        assert_eq!(
            err.to_string(),
            "Illegal status transition from Draft to Posted"
        );
    }
}
