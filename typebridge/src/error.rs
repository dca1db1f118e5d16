//! Error types for the translation core.
//!
//! Every diagnostic the pipeline can produce is a [`GenerateError`]. In
//! non-strict runs most of them are downgraded to warnings through
//! [`crate::diagnostics::Diagnostics::report`]; the missing-collaborator
//! variants are always fatal.

use thiserror::Error;

/// Result type alias for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors produced while translating a surface manifest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// A type descriptor the mapper cannot classify.
    #[error("Unknown type '{repr}' cannot be translated")]
    UnresolvedType { repr: String },

    /// The named registry does not exist in the loaded manifest.
    #[error("Registry '{name}' not found in surface manifest")]
    MissingRegistry { name: String },

    /// The named event table does not exist in the loaded manifest.
    #[error("Event table '{name}' not found in surface manifest")]
    MissingEventTable { name: String },

    /// A model is reachable from the RPC surface but carries no schema.
    #[error("Model '{name}' is referenced but has no schema in the manifest")]
    MissingModel { name: String },

    /// A reference that does not resolve in the flattened definitions table.
    #[error("Reference '{reference}' does not resolve after flattening")]
    DanglingReference { reference: String },

    /// Two structurally different definitions collided on the same name.
    #[error("Definition '{name}' redeclared with a different structure")]
    DefinitionCollision { name: String },
}

impl GenerateError {
    /// Create an unresolved-type error.
    pub fn unresolved_type(repr: impl Into<String>) -> Self {
        Self::UnresolvedType { repr: repr.into() }
    }

    /// Create a missing-registry error.
    pub fn missing_registry(name: impl Into<String>) -> Self {
        Self::MissingRegistry { name: name.into() }
    }

    /// Create a missing-event-table error.
    pub fn missing_event_table(name: impl Into<String>) -> Self {
        Self::MissingEventTable { name: name.into() }
    }

    /// Create a missing-model error.
    pub fn missing_model(name: impl Into<String>) -> Self {
        Self::MissingModel { name: name.into() }
    }

    /// Create a dangling-reference error.
    pub fn dangling_reference(reference: impl Into<String>) -> Self {
        Self::DanglingReference {
            reference: reference.into(),
        }
    }

    /// Create a definition-collision error.
    pub fn definition_collision(name: impl Into<String>) -> Self {
        Self::DefinitionCollision { name: name.into() }
    }
}
