//! Transaction service for header and line management.

use chrono::Utc;
use rust_decimal::Decimal;
use tessera_shared::types::{OrganizationId, TransactionId, TransactionLineId};

use super::error::TransactionError;
use super::types::{
    LineReconciliation, NewTransaction, NewTransactionLine, TransactionHeader, TransactionLine,
    TransactionStatus,
};
use crate::smartcode::SmartCode;
use crate::store::TransactionStore;

/// Transaction service over a storage adapter.
///
/// Enforces the `Draft -> Confirmed -> {Posted, Cancelled}` lifecycle and
/// per-header line-number uniqueness. Entity references on lines are *not*
/// validated here - referential integrity is the caller's concern.
pub struct TransactionService<S> {
    store: S,
}

impl<S: TransactionStore> TransactionService<S> {
    /// Creates a service over the given storage adapter.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying adapter.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the service, returning the underlying adapter.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Creates a new transaction header in `Draft` status.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank transaction type or a
    /// malformed smart code.
    pub fn create_transaction(
        &mut self,
        organization: OrganizationId,
        new: NewTransaction,
    ) -> Result<TransactionId, TransactionError> {
        if new.transaction_type.trim().is_empty() {
            return Err(TransactionError::MissingType);
        }
        SmartCode::parse(&new.smart_code)?;

        let now = Utc::now();
        let header = TransactionHeader {
            id: TransactionId::new(),
            organization_id: organization,
            transaction_type: new.transaction_type,
            smart_code: new.smart_code,
            transaction_date: new.transaction_date,
            total_amount: new.total_amount,
            status: TransactionStatus::Draft,
            reference_entity: new.reference_entity,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        };
        let id = header.id;
        self.store.insert_header(header)?;
        Ok(id)
    }

    /// Adds a line to a draft transaction.
    ///
    /// # Errors
    ///
    /// Returns not-found for a header outside the organization, a conflict
    /// for a duplicate line number, and a business-rule error when the
    /// header is no longer editable.
    pub fn add_line(
        &mut self,
        organization: OrganizationId,
        transaction: TransactionId,
        new: NewTransactionLine,
    ) -> Result<TransactionLineId, TransactionError> {
        let header = self.require_header(organization, transaction)?;
        if !header.status.is_editable() {
            return Err(TransactionError::NotEditable(header.status));
        }
        SmartCode::parse(&new.smart_code)?;

        let existing = self.store.lines(organization, transaction)?;
        if existing.iter().any(|l| l.line_number == new.line_number) {
            return Err(TransactionError::DuplicateLineNumber {
                line_number: new.line_number,
            });
        }

        let line = TransactionLine {
            id: TransactionLineId::new(),
            transaction_id: transaction,
            line_number: new.line_number,
            entity_id: new.entity_id,
            quantity: new.quantity,
            unit_amount: new.unit_amount,
            line_amount: new.line_amount,
            smart_code: new.smart_code,
            payload: new.payload,
        };
        let id = line.id;
        self.store.insert_line(organization, line)?;
        Ok(id)
    }

    /// Transitions a transaction along its lifecycle.
    ///
    /// Only `Draft -> Confirmed` and `Confirmed -> {Posted, Cancelled}` are
    /// legal; posted headers are never edited in place.
    ///
    /// # Errors
    ///
    /// Returns not-found for a header outside the organization and a
    /// business-rule error for an illegal transition.
    pub fn update_status(
        &mut self,
        organization: OrganizationId,
        transaction: TransactionId,
        next: TransactionStatus,
    ) -> Result<(), TransactionError> {
        let mut header = self.require_header(organization, transaction)?;
        if !header.status.can_transition_to(next) {
            return Err(TransactionError::InvalidTransition {
                from: header.status,
                to: next,
            });
        }
        header.status = next;
        header.updated_at = Utc::now();
        self.store.update_header(header)?;
        Ok(())
    }

    /// Reconciles the sum of line amounts against the header total.
    ///
    /// # Errors
    ///
    /// Returns not-found for a header outside the organization.
    pub fn line_reconciliation(
        &self,
        organization: OrganizationId,
        transaction: TransactionId,
        tolerance: Decimal,
    ) -> Result<LineReconciliation, TransactionError> {
        let header = self.require_header(organization, transaction)?;
        let lines = self.store.lines(organization, transaction)?;
        Ok(reconcile_lines(&header, &lines, tolerance))
    }

    fn require_header(
        &self,
        organization: OrganizationId,
        id: TransactionId,
    ) -> Result<TransactionHeader, TransactionError> {
        self.store
            .header(organization, id)?
            .ok_or(TransactionError::TransactionNotFound(id))
    }
}

/// Reconciles a set of lines against their header total.
#[must_use]
pub fn reconcile_lines(
    header: &TransactionHeader,
    lines: &[TransactionLine],
    tolerance: Decimal,
) -> LineReconciliation {
    let line_total: Decimal = lines.iter().map(|l| l.line_amount).sum();
    let difference = line_total - header.total_amount;
    LineReconciliation {
        line_total,
        header_total: header.total_amount,
        difference,
        within_tolerance: difference.abs() <= tolerance,
    }
}
