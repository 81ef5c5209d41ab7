//! Entity service enforcing validation and tenant isolation.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use tessera_shared::types::{EntityId, OrganizationId, RelationshipId};

use super::error::EntityError;
use super::types::{
    DynamicField, DynamicValue, Entity, EntityPatch, EntityStatus, NewEntity, Organization,
    Relationship,
};
use crate::smartcode::SmartCode;
use crate::store::EntityStore;

/// Entity service over a storage adapter.
///
/// Business rules live here; the adapter only moves rows. No generic
/// referential-integrity cascade is offered - callers own cleanup.
pub struct EntityService<S> {
    store: S,
}

impl<S: EntityStore> EntityService<S> {
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

    /// Creates a new organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the adapter fails.
    pub fn create_organization(
        &mut self,
        name: &str,
        code: Option<&str>,
        settings: Value,
    ) -> Result<OrganizationId, EntityError> {
        if name.trim().is_empty() {
            return Err(EntityError::MissingOrganizationName);
        }

        let organization = Organization {
            id: OrganizationId::new(),
            name: name.to_string(),
            code: code.map(str::to_string),
            is_active: true,
            settings,
            created_at: Utc::now(),
        };
        let id = organization.id;
        self.store.insert_organization(organization)?;
        Ok(id)
    }

    /// Creates a new entity within an organization.
    ///
    /// # Errors
    ///
    /// Returns a validation error if name or type is blank, if the smart
    /// code is malformed, or if the organization does not exist.
    pub fn create_entity(
        &mut self,
        organization: OrganizationId,
        new: NewEntity,
    ) -> Result<EntityId, EntityError> {
        if new.name.trim().is_empty() {
            return Err(EntityError::MissingName);
        }
        if new.entity_type.trim().is_empty() {
            return Err(EntityError::MissingType);
        }
        SmartCode::parse(&new.smart_code)?;
        self.require_organization(organization)?;

        let now = Utc::now();
        let entity = Entity {
            id: EntityId::new(),
            organization_id: organization,
            entity_type: new.entity_type,
            name: new.name,
            code: new.code,
            status: EntityStatus::Active,
            smart_code: new.smart_code,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        };
        let id = entity.id;
        self.store.insert_entity(entity)?;
        Ok(id)
    }

    /// Applies a patch to an entity.
    ///
    /// # Errors
    ///
    /// Returns not-found for an entity outside the organization, and a
    /// validation error for a blank replacement name.
    pub fn update_entity(
        &mut self,
        organization: OrganizationId,
        id: EntityId,
        patch: EntityPatch,
    ) -> Result<(), EntityError> {
        let mut entity = self.require_entity(organization, id)?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(EntityError::MissingName);
            }
            entity.name = name;
        }
        if let Some(code) = patch.code {
            entity.code = Some(code);
        }
        if let Some(metadata) = patch.metadata {
            entity.metadata = metadata;
        }
        entity.updated_at = Utc::now();

        self.store.update_entity(entity)?;
        Ok(())
    }

    /// Transitions an entity's lifecycle status.
    ///
    /// Entities are never hard-deleted; `Deleted` is the strongest state.
    ///
    /// # Errors
    ///
    /// Returns not-found for an entity outside the organization.
    pub fn set_status(
        &mut self,
        organization: OrganizationId,
        id: EntityId,
        status: EntityStatus,
    ) -> Result<(), EntityError> {
        let mut entity = self.require_entity(organization, id)?;
        entity.status = status;
        entity.updated_at = Utc::now();
        self.store.update_entity(entity)?;
        Ok(())
    }

    /// Creates or overwrites a typed attribute, keyed by (entity, field name).
    ///
    /// # Errors
    ///
    /// Returns not-found for an entity outside the organization and a
    /// validation error for a blank field name or malformed smart code.
    pub fn set_dynamic_field(
        &mut self,
        organization: OrganizationId,
        entity: EntityId,
        field_name: &str,
        value: DynamicValue,
        smart_code: Option<String>,
    ) -> Result<(), EntityError> {
        if field_name.trim().is_empty() {
            return Err(EntityError::MissingFieldName);
        }
        if let Some(code) = &smart_code {
            SmartCode::parse(code)?;
        }
        self.require_entity(organization, entity)?;

        let field = DynamicField {
            entity_id: entity,
            field_name: field_name.to_string(),
            value,
            smart_code,
            updated_at: Utc::now(),
        };
        self.store.upsert_dynamic_field(organization, field)?;
        Ok(())
    }

    /// Returns all dynamic fields of an entity as a name-to-value map.
    ///
    /// # Errors
    ///
    /// Returns not-found for an entity outside the organization.
    pub fn dynamic_data(
        &self,
        organization: OrganizationId,
        entity: EntityId,
    ) -> Result<BTreeMap<String, DynamicValue>, EntityError> {
        self.require_entity(organization, entity)?;
        let fields = self.store.dynamic_fields(organization, entity)?;
        Ok(fields
            .into_iter()
            .map(|field| (field.field_name, field.value))
            .collect())
    }

    /// Creates a directed typed relationship between two entities.
    ///
    /// # Errors
    ///
    /// Returns not-found if either endpoint is missing from the organization
    /// and a validation error for a blank relationship type.
    pub fn create_relationship(
        &mut self,
        organization: OrganizationId,
        from: EntityId,
        to: EntityId,
        relationship_type: &str,
        data: Option<Value>,
    ) -> Result<RelationshipId, EntityError> {
        if relationship_type.trim().is_empty() {
            return Err(EntityError::MissingRelationshipType);
        }
        self.require_entity(organization, from)?;
        self.require_entity(organization, to)?;

        let relationship = Relationship {
            id: RelationshipId::new(),
            organization_id: organization,
            from_entity: from,
            to_entity: to,
            relationship_type: relationship_type.to_string(),
            data,
            created_at: Utc::now(),
        };
        let id = relationship.id;
        self.store.insert_relationship(relationship)?;
        Ok(id)
    }

    /// Returns relationships touching an entity, optionally filtered by type.
    ///
    /// # Errors
    ///
    /// Returns not-found for an entity outside the organization.
    pub fn relationships_of(
        &self,
        organization: OrganizationId,
        entity: EntityId,
        type_filter: Option<&str>,
    ) -> Result<Vec<Relationship>, EntityError> {
        self.require_entity(organization, entity)?;
        let mut relationships = self.store.relationships(organization, entity)?;
        if let Some(filter) = type_filter {
            relationships.retain(|r| r.relationship_type == filter);
        }
        Ok(relationships)
    }

    fn require_organization(&self, id: OrganizationId) -> Result<Organization, EntityError> {
        self.store
            .organization(id)?
            .ok_or(EntityError::OrganizationNotFound(id))
    }

    fn require_entity(
        &self,
        organization: OrganizationId,
        id: EntityId,
    ) -> Result<Entity, EntityError> {
        self.store
            .entity(organization, id)?
            .ok_or(EntityError::EntityNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tessera_shared::AppResult;

    /// Minimal in-memory adapter for exercising the service rules.
    #[derive(Default)]
    struct TestStore {
        organizations: HashMap<OrganizationId, Organization>,
        entities: HashMap<(OrganizationId, EntityId), Entity>,
        fields: HashMap<(OrganizationId, EntityId, String), DynamicField>,
        relationships: Vec<Relationship>,
    }

    impl EntityStore for TestStore {
        fn insert_organization(&mut self, organization: Organization) -> AppResult<()> {
            self.organizations.insert(organization.id, organization);
            Ok(())
        }

        fn organization(&self, id: OrganizationId) -> AppResult<Option<Organization>> {
            Ok(self.organizations.get(&id).cloned())
        }

        fn insert_entity(&mut self, entity: Entity) -> AppResult<()> {
            self.entities
                .insert((entity.organization_id, entity.id), entity);
            Ok(())
        }

        fn entity(&self, org: OrganizationId, id: EntityId) -> AppResult<Option<Entity>> {
            Ok(self.entities.get(&(org, id)).cloned())
        }

        fn update_entity(&mut self, entity: Entity) -> AppResult<()> {
            self.entities
                .insert((entity.organization_id, entity.id), entity);
            Ok(())
        }

        fn upsert_dynamic_field(
            &mut self,
            org: OrganizationId,
            field: DynamicField,
        ) -> AppResult<()> {
            self.fields
                .insert((org, field.entity_id, field.field_name.clone()), field);
            Ok(())
        }

        fn dynamic_fields(
            &self,
            org: OrganizationId,
            entity: EntityId,
        ) -> AppResult<Vec<DynamicField>> {
            Ok(self
                .fields
                .iter()
                .filter(|((o, e, _), _)| *o == org && *e == entity)
                .map(|(_, f)| f.clone())
                .collect())
        }

        fn insert_relationship(&mut self, relationship: Relationship) -> AppResult<()> {
            self.relationships.push(relationship);
            Ok(())
        }

        fn relationships(
            &self,
            org: OrganizationId,
            entity: EntityId,
        ) -> AppResult<Vec<Relationship>> {
            Ok(self
                .relationships
                .iter()
                .filter(|r| {
                    r.organization_id == org && (r.from_entity == entity || r.to_entity == entity)
                })
                .cloned()
                .collect())
        }
    }

    fn service_with_org() -> (EntityService<TestStore>, OrganizationId) {
        let mut service = EntityService::new(TestStore::default());
        let org = service
            .create_organization("Aurora Jewels", Some("AUR"), json!({}))
            .unwrap();
        (service, org)
    }

    fn new_product(name: &str) -> NewEntity {
        NewEntity {
            entity_type: "product".to_string(),
            name: name.to_string(),
            code: None,
            smart_code: "TESSERA.JEWELRY.PRODUCT.RING.ENT.v1".to_string(),
            metadata: json!({}),
        }
    }

    #[test]
    fn test_create_entity() {
        let (mut service, org) = service_with_org();
        let id = service.create_entity(org, new_product("Gold Ring")).unwrap();
        let entity = service.store().entity(org, id).unwrap().unwrap();
        assert_eq!(entity.name, "Gold Ring");
        assert_eq!(entity.status, EntityStatus::Active);
    }

    #[test]
    fn test_create_entity_requires_name_and_type() {
        let (mut service, org) = service_with_org();

        let mut no_name = new_product("");
        no_name.name = "   ".to_string();
        assert!(matches!(
            service.create_entity(org, no_name),
            Err(EntityError::MissingName)
        ));

        let mut no_type = new_product("Gold Ring");
        no_type.entity_type = String::new();
        assert!(matches!(
            service.create_entity(org, no_type),
            Err(EntityError::MissingType)
        ));
    }

    #[test]
    fn test_create_entity_rejects_malformed_smart_code() {
        let (mut service, org) = service_with_org();
        let mut bad = new_product("Gold Ring");
        bad.smart_code = "TESSERA.JEWELRY".to_string();
        assert!(matches!(
            service.create_entity(org, bad),
            Err(EntityError::MalformedSmartCode(_))
        ));
    }

    #[test]
    fn test_create_entity_unknown_organization() {
        let (mut service, _org) = service_with_org();
        assert!(matches!(
            service.create_entity(OrganizationId::new(), new_product("Ring")),
            Err(EntityError::OrganizationNotFound(_))
        ));
    }

    #[test]
    fn test_set_status_is_soft() {
        let (mut service, org) = service_with_org();
        let id = service.create_entity(org, new_product("Gold Ring")).unwrap();
        service.set_status(org, id, EntityStatus::Deleted).unwrap();
        // Still readable: deletion is a status transition, not removal.
        let entity = service.store().entity(org, id).unwrap().unwrap();
        assert_eq!(entity.status, EntityStatus::Deleted);
    }

    #[test]
    fn test_dynamic_field_upsert_overwrites() {
        let (mut service, org) = service_with_org();
        let id = service.create_entity(org, new_product("Gold Ring")).unwrap();

        service
            .set_dynamic_field(
                org,
                id,
                "purity_karat",
                DynamicValue::Number(rust_decimal_macros::dec!(22)),
                None,
            )
            .unwrap();
        service
            .set_dynamic_field(
                org,
                id,
                "purity_karat",
                DynamicValue::Number(rust_decimal_macros::dec!(18)),
                None,
            )
            .unwrap();

        let data = service.dynamic_data(org, id).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(
            data["purity_karat"].as_number(),
            Some(rust_decimal_macros::dec!(18))
        );
    }

    #[test]
    fn test_relationship_requires_both_endpoints() {
        let (mut service, org) = service_with_org();
        let from = service.create_entity(org, new_product("Recipe")).unwrap();

        assert!(matches!(
            service.create_relationship(org, from, EntityId::new(), "recipe_for", None),
            Err(EntityError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_relationship_does_not_cross_organizations() {
        let (mut service, org) = service_with_org();
        let other_org = service
            .create_organization("Other Tenant", None, json!({}))
            .unwrap();
        let ours = service.create_entity(org, new_product("Ring")).unwrap();
        let theirs = service
            .create_entity(other_org, new_product("Chain"))
            .unwrap();

        assert!(matches!(
            service.create_relationship(org, ours, theirs, "recipe_for", None),
            Err(EntityError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_relationships_of_filters_by_type() {
        let (mut service, org) = service_with_org();
        let a = service.create_entity(org, new_product("Ring")).unwrap();
        let b = service.create_entity(org, new_product("Alloy")).unwrap();
        service
            .create_relationship(org, b, a, "recipe_for", None)
            .unwrap();
        service
            .create_relationship(org, a, b, "supplied_by", None)
            .unwrap();

        let all = service.relationships_of(org, a, None).unwrap();
        assert_eq!(all.len(), 2);
        let recipes = service.relationships_of(org, a, Some("recipe_for")).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].from_entity, b);
    }
}
