//! Generic business entities and their schema-less attributes.
//!
//! This module implements the entity side of the substrate:
//! - Organizations (tenant boundary)
//! - Entities (generic typed business objects)
//! - Dynamic fields (typed attributes without schema migrations)
//! - Relationships (directed typed edges between entities)
//! - Error types for entity operations
//! - Entity service enforcing validation and tenant isolation

pub mod error;
pub mod service;
pub mod types;

pub use error::EntityError;
pub use service::EntityService;
pub use types::{
    DynamicField, DynamicValue, Entity, EntityPatch, EntityStatus, NewEntity, Organization,
    Relationship,
};
