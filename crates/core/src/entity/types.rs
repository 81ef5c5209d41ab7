//! Entity domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_shared::types::{EntityId, OrganizationId, RelationshipId};

/// Lifecycle status of an entity.
///
/// Entities are never hard-deleted; `Deleted` is a terminal soft state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    /// Entity is live and usable.
    Active,
    /// Entity is retired from day-to-day use but kept for history.
    Archived,
    /// Entity is soft-deleted.
    Deleted,
}

impl EntityStatus {
    /// Returns true if the entity can still be referenced by new records.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// An organization: the tenant boundary.
///
/// Every other record in the substrate carries an [`OrganizationId`]; no
/// record is visible or mutable across organization boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for this organization.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Optional short code.
    pub code: Option<String>,
    /// Whether the organization is active.
    pub is_active: bool,
    /// Free-form tenant settings.
    pub settings: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A generic business object.
///
/// Any domain module may create entities; the `entity_type` tag and smart
/// code carry the business meaning, while `metadata` and dynamic fields hold
/// domain-specific facts without schema migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// The organization this entity belongs to.
    pub organization_id: OrganizationId,
    /// Free-form type tag (e.g. `customer`, `product`, `karigar`).
    pub entity_type: String,
    /// Display name.
    pub name: String,
    /// Optional short code.
    pub code: Option<String>,
    /// Lifecycle status (soft transitions only).
    pub status: EntityStatus,
    /// Smart code identifying the business meaning of this entity.
    pub smart_code: String,
    /// Free-form metadata.
    pub metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new entity.
#[derive(Debug, Clone)]
pub struct NewEntity {
    /// Free-form type tag (required non-blank).
    pub entity_type: String,
    /// Display name (required non-blank).
    pub name: String,
    /// Optional short code.
    pub code: Option<String>,
    /// Smart code identifying the business meaning.
    pub smart_code: String,
    /// Free-form metadata.
    pub metadata: Value,
}

/// Patch applied by `update_entity`. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    /// New display name.
    pub name: Option<String>,
    /// New short code.
    pub code: Option<String>,
    /// New metadata document (replaces the previous one).
    pub metadata: Option<Value>,
}

/// A typed attribute value: a tagged union, not five nullable columns.
///
/// Readers match on the tag rather than probing column after column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DynamicValue {
    /// Free text.
    Text(String),
    /// Numeric value with decimal precision.
    Number(Decimal),
    /// Boolean flag.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Arbitrary JSON document.
    Json(Value),
}

impl DynamicValue {
    /// Returns the tag name of this value.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Date(_) => "date",
            Self::Json(_) => "json",
        }
    }

    /// Returns the numeric value, if this is a `Number`.
    #[must_use]
    pub const fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text value, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One typed attribute row, keyed by (entity id, field name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicField {
    /// The entity this field extends.
    pub entity_id: EntityId,
    /// Field name (upsert key together with `entity_id`).
    pub field_name: String,
    /// The typed value.
    pub value: DynamicValue,
    /// Optional smart code identifying the business meaning of this field.
    pub smart_code: Option<String>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A directed typed edge between two entities of the same organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier for this relationship.
    pub id: RelationshipId,
    /// The organization both endpoints belong to.
    pub organization_id: OrganizationId,
    /// Source entity.
    pub from_entity: EntityId,
    /// Target entity.
    pub to_entity: EntityId,
    /// Relationship type tag (e.g. `recipe_for`, `reports_to`).
    pub relationship_type: String,
    /// Optional payload.
    pub data: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
