//! Transaction headers and ordered line items.
//!
//! This module implements the domain-agnostic transaction side of the
//! substrate:
//! - Transaction headers with a guarded lifecycle
//! - Ordered, uniquely numbered line items
//! - Line-total reconciliation against the header total
//! - Compensating (reversal) transactions for posted headers
//! - Error types for transaction operations
//! - Transaction service enforcing validation and tenant isolation

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;

pub use error::TransactionError;
pub use reversal::build_reversal;
pub use service::TransactionService;
pub use types::{
    LineReconciliation, NewTransaction, NewTransactionLine, TransactionHeader, TransactionLine,
    TransactionStatus,
};
