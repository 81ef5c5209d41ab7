//! Entity error types.

use tessera_shared::types::{EntityId, OrganizationId};
use thiserror::Error;

use crate::smartcode::SmartCodeError;

/// Errors that can occur during entity operations.
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity name is required and must be non-blank.
    #[error("Entity name is required")]
    MissingName,

    /// Entity type is required and must be non-blank.
    #[error("Entity type is required")]
    MissingType,

    /// Organization name is required and must be non-blank.
    #[error("Organization name is required")]
    MissingOrganizationName,

    /// Relationship type is required and must be non-blank.
    #[error("Relationship type is required")]
    MissingRelationshipType,

    /// Field name is required and must be non-blank.
    #[error("Field name is required")]
    MissingFieldName,

    /// The smart code attached to the record is malformed.
    #[error(transparent)]
    MalformedSmartCode(#[from] SmartCodeError),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// Entity not found within the organization.
    #[error("Entity not found in organization: {0}")]
    EntityNotFound(EntityId),

    /// Storage adapter error.
    #[error(transparent)]
    Storage(#[from] tessera_shared::AppError),
}

impl EntityError {
    /// Returns the error code for structured responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingName => "MISSING_NAME",
            Self::MissingType => "MISSING_TYPE",
            Self::MissingOrganizationName => "MISSING_ORGANIZATION_NAME",
            Self::MissingRelationshipType => "MISSING_RELATIONSHIP_TYPE",
            Self::MissingFieldName => "MISSING_FIELD_NAME",
            Self::MalformedSmartCode(_) => "MALFORMED_SMART_CODE",
            Self::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            Self::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EntityError::MissingName.error_code(), "MISSING_NAME");
        assert_eq!(
            EntityError::EntityNotFound(EntityId::new()).error_code(),
            "ENTITY_NOT_FOUND"
        );
    }

    #[test]
    fn test_malformed_smart_code_display() {
        let err = EntityError::from(SmartCodeError::TooFewSegments {
            code: "TESSERA.JEWELRY".to_string(),
        });
        assert!(err.to_string().contains("TESSERA.JEWELRY"));
    }
}
