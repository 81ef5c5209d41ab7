//! Transaction domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_shared::types::{EntityId, OrganizationId, TransactionId, TransactionLineId};

/// Transaction status in the posting lifecycle.
///
/// Transactions progress `Draft -> Confirmed -> {Posted, Cancelled}`.
/// `Posted` is terminal for financial effect; corrections are compensating
/// transactions, never in-place edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction is being drafted and can be modified.
    Draft,
    /// Transaction has been confirmed and awaits posting.
    Confirmed,
    /// Transaction has been posted (immutable).
    Posted,
    /// Transaction has been cancelled (immutable).
    Cancelled,
}

impl TransactionStatus {
    /// Returns true if the transaction can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction is in a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }

    /// Returns true if `next` is a legal transition from this status.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Confirmed)
                | (Self::Confirmed, Self::Posted | Self::Cancelled)
        )
    }
}

/// A business event: the header of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Unique identifier for this transaction.
    pub id: TransactionId,
    /// The organization this transaction belongs to.
    pub organization_id: OrganizationId,
    /// Free-form type tag (e.g. `pos_sale`, `jobwork_issue`).
    pub transaction_type: String,
    /// Smart code identifying the business meaning; drives rule dispatch.
    pub smart_code: String,
    /// The date of the transaction.
    pub transaction_date: NaiveDate,
    /// Header total amount.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Optional reference entity (e.g. the customer).
    pub reference_entity: Option<EntityId>,
    /// Free-form metadata (e.g. `place_of_supply`).
    pub metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An ordered child line of a transaction header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier for this line.
    pub id: TransactionLineId,
    /// The header this line belongs to.
    pub transaction_id: TransactionId,
    /// Line number, unique per header. Ordering is convention, not enforced.
    pub line_number: u32,
    /// Optional entity reference (e.g. the product sold).
    pub entity_id: Option<EntityId>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit amount.
    pub unit_amount: Decimal,
    /// Line amount.
    pub line_amount: Decimal,
    /// Smart code classifying this line for rule processing.
    pub smart_code: String,
    /// Domain payload (weights, purities, rates, charge tags, ...).
    pub payload: Value,
}

/// Input for creating a new transaction header.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Free-form type tag (required non-blank).
    pub transaction_type: String,
    /// Smart code identifying the business meaning.
    pub smart_code: String,
    /// The date of the transaction.
    pub transaction_date: NaiveDate,
    /// Header total amount.
    pub total_amount: Decimal,
    /// Optional reference entity.
    pub reference_entity: Option<EntityId>,
    /// Free-form metadata.
    pub metadata: Value,
}

/// Input for creating a new transaction line.
#[derive(Debug, Clone)]
pub struct NewTransactionLine {
    /// Line number, unique per header.
    pub line_number: u32,
    /// Optional entity reference.
    pub entity_id: Option<EntityId>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit amount.
    pub unit_amount: Decimal,
    /// Line amount.
    pub line_amount: Decimal,
    /// Smart code classifying this line.
    pub smart_code: String,
    /// Domain payload.
    pub payload: Value,
}

/// Result of reconciling line amounts against the header total.
///
/// Reconciliation is domain-enforced, not generic: the tolerance comes from
/// the caller (typically the finance context's balance tolerance).
#[derive(Debug, Clone)]
pub struct LineReconciliation {
    /// Sum of line amounts.
    pub line_total: Decimal,
    /// Header total amount.
    pub header_total: Decimal,
    /// `line_total - header_total`.
    pub difference: Decimal,
    /// Whether the absolute difference is within the supplied tolerance.
    pub within_tolerance: bool,
}
