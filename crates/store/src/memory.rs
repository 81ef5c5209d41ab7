//! HashMap-backed storage adapter.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use tessera_core::entity::types::{DynamicField, Entity, Organization, Relationship};
use tessera_core::store::{EntityStore, TransactionStore};
use tessera_core::transaction::types::{TransactionHeader, TransactionLine};
use tessera_shared::AppResult;
use tessera_shared::types::{EntityId, OrganizationId, TransactionId};

/// In-memory store implementing both adapter contracts.
///
/// Rows are keyed by organization id first, so a lookup can never observe
/// another tenant's data. Not durable; a relational adapter replaces this
/// in production deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    organizations: HashMap<OrganizationId, Organization>,
    entities: HashMap<(OrganizationId, EntityId), Entity>,
    dynamic_fields: BTreeMap<(OrganizationId, EntityId, String), DynamicField>,
    relationships: HashMap<OrganizationId, Vec<Relationship>>,
    headers: HashMap<(OrganizationId, TransactionId), TransactionHeader>,
    lines: HashMap<(OrganizationId, TransactionId), Vec<TransactionLine>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of organizations held.
    #[must_use]
    pub fn organization_count(&self) -> usize {
        self.organizations.len()
    }
}

impl EntityStore for MemoryStore {
    fn insert_organization(&mut self, organization: Organization) -> AppResult<()> {
        debug!(id = %organization.id, name = %organization.name, "insert organization");
        self.organizations.insert(organization.id, organization);
        Ok(())
    }

    fn organization(&self, id: OrganizationId) -> AppResult<Option<Organization>> {
        Ok(self.organizations.get(&id).cloned())
    }

    fn insert_entity(&mut self, entity: Entity) -> AppResult<()> {
        debug!(id = %entity.id, entity_type = %entity.entity_type, "insert entity");
        self.entities
            .insert((entity.organization_id, entity.id), entity);
        Ok(())
    }

    fn entity(&self, organization: OrganizationId, id: EntityId) -> AppResult<Option<Entity>> {
        Ok(self.entities.get(&(organization, id)).cloned())
    }

    fn update_entity(&mut self, entity: Entity) -> AppResult<()> {
        self.entities
            .insert((entity.organization_id, entity.id), entity);
        Ok(())
    }

    fn upsert_dynamic_field(
        &mut self,
        organization: OrganizationId,
        field: DynamicField,
    ) -> AppResult<()> {
        self.dynamic_fields.insert(
            (organization, field.entity_id, field.field_name.clone()),
            field,
        );
        Ok(())
    }

    fn dynamic_fields(
        &self,
        organization: OrganizationId,
        entity: EntityId,
    ) -> AppResult<Vec<DynamicField>> {
        Ok(self
            .dynamic_fields
            .range((organization, entity, String::new())..)
            .take_while(|((org, ent, _), _)| *org == organization && *ent == entity)
            .map(|(_, field)| field.clone())
            .collect())
    }

    fn insert_relationship(&mut self, relationship: Relationship) -> AppResult<()> {
        self.relationships
            .entry(relationship.organization_id)
            .or_default()
            .push(relationship);
        Ok(())
    }

    fn relationships(
        &self,
        organization: OrganizationId,
        entity: EntityId,
    ) -> AppResult<Vec<Relationship>> {
        Ok(self
            .relationships
            .get(&organization)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|r| r.from_entity == entity || r.to_entity == entity)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl TransactionStore for MemoryStore {
    fn insert_header(&mut self, header: TransactionHeader) -> AppResult<()> {
        debug!(id = %header.id, smart_code = %header.smart_code, "insert transaction header");
        self.headers
            .insert((header.organization_id, header.id), header);
        Ok(())
    }

    fn header(
        &self,
        organization: OrganizationId,
        id: TransactionId,
    ) -> AppResult<Option<TransactionHeader>> {
        Ok(self.headers.get(&(organization, id)).cloned())
    }

    fn update_header(&mut self, header: TransactionHeader) -> AppResult<()> {
        self.headers
            .insert((header.organization_id, header.id), header);
        Ok(())
    }

    fn insert_line(
        &mut self,
        organization: OrganizationId,
        line: TransactionLine,
    ) -> AppResult<()> {
        self.lines
            .entry((organization, line.transaction_id))
            .or_default()
            .push(line);
        Ok(())
    }

    fn lines(
        &self,
        organization: OrganizationId,
        transaction: TransactionId,
    ) -> AppResult<Vec<TransactionLine>> {
        let mut lines = self
            .lines
            .get(&(organization, transaction))
            .cloned()
            .unwrap_or_default();
        lines.sort_by_key(|l| l.line_number);
        Ok(lines)
    }
}
