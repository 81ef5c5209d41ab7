//! Storage adapter contract.
//!
//! This core assumes an external atomic relational store; these traits are
//! the contract against that adapter, not an implementation of storage.
//! Every read and write is keyed by [`OrganizationId`], so tenant isolation
//! is structural: an adapter cannot hand back another organization's record
//! without violating its own signature.
//!
//! Adapters are expected to persist a header, its lines, and any derived GL
//! entries in one atomic unit of work owned by the caller; this core neither
//! opens transactions nor takes locks.

use tessera_shared::AppResult;
use tessera_shared::types::{EntityId, OrganizationId, TransactionId};

use crate::entity::types::{DynamicField, Entity, Organization, Relationship};
use crate::transaction::types::{TransactionHeader, TransactionLine};

/// Adapter contract for organizations, entities, attributes, and relationships.
pub trait EntityStore {
    /// Inserts a new organization.
    fn insert_organization(&mut self, organization: Organization) -> AppResult<()>;

    /// Fetches an organization by id.
    fn organization(&self, id: OrganizationId) -> AppResult<Option<Organization>>;

    /// Inserts a new entity.
    fn insert_entity(&mut self, entity: Entity) -> AppResult<()>;

    /// Fetches an entity by id, scoped to its organization.
    fn entity(&self, organization: OrganizationId, id: EntityId) -> AppResult<Option<Entity>>;

    /// Replaces an existing entity row.
    fn update_entity(&mut self, entity: Entity) -> AppResult<()>;

    /// Inserts or overwrites the field row keyed by (entity id, field name).
    fn upsert_dynamic_field(
        &mut self,
        organization: OrganizationId,
        field: DynamicField,
    ) -> AppResult<()>;

    /// Returns all dynamic fields of an entity.
    fn dynamic_fields(
        &self,
        organization: OrganizationId,
        entity: EntityId,
    ) -> AppResult<Vec<DynamicField>>;

    /// Inserts a new relationship.
    fn insert_relationship(&mut self, relationship: Relationship) -> AppResult<()>;

    /// Returns relationships touching an entity (either direction).
    fn relationships(
        &self,
        organization: OrganizationId,
        entity: EntityId,
    ) -> AppResult<Vec<Relationship>>;
}

/// Adapter contract for transaction headers and lines.
pub trait TransactionStore {
    /// Inserts a new transaction header.
    fn insert_header(&mut self, header: TransactionHeader) -> AppResult<()>;

    /// Fetches a header by id, scoped to its organization.
    fn header(
        &self,
        organization: OrganizationId,
        id: TransactionId,
    ) -> AppResult<Option<TransactionHeader>>;

    /// Replaces an existing header row.
    fn update_header(&mut self, header: TransactionHeader) -> AppResult<()>;

    /// Inserts a new transaction line.
    fn insert_line(&mut self, organization: OrganizationId, line: TransactionLine)
    -> AppResult<()>;

    /// Returns a header's lines ordered by line number.
    fn lines(
        &self,
        organization: OrganizationId,
        transaction: TransactionId,
    ) -> AppResult<Vec<TransactionLine>>;
}
