//! Unified error type exposed by **`modelgen-core`**.
//!
//! Every stage of the generation pipeline reports failures through
//! [`GenerationError`]. The core performs no local recovery: an error aborts
//! the current generation request and reaches the caller as-is. Provider
//! crates convert their internal errors into [`GenerationError::Backend`]
//! before bubbling them up.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// A field description references a field the entity does not allow to
    /// be assigned. This is a code defect and is never retried.
    #[error("field `{field}` on `{entity}` is described for generation but is not fillable")]
    Configuration {
        entity: &'static str,
        field: String,
    },

    /// The requested entity does not expose generation metadata.
    #[error("entity `{entity}` does not support schema derivation")]
    UnsupportedType { entity: String },

    /// No entity with that name was registered.
    #[error("entity `{entity}` is not registered")]
    UnknownEntity { entity: String },

    /// The backend output is not a JSON object or violates the required-field
    /// closure of the derived schema.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    /// A generatable relation has no matching relation accessor.
    #[error("relation `{relation}` is not declared on `{entity}`")]
    RelationResolution {
        entity: &'static str,
        relation: String,
    },

    /// Failure while writing to the store. The surrounding transaction has
    /// been rolled back by the time the caller sees this.
    #[error("persistence failed: {0}")]
    Persistence(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The selected backend does not recognise the requested `model`.
    #[error("provider `{provider}` does not support model `{model}`")]
    ModelNotSupported { provider: &'static str, model: String },

    /// Failure while serialising or deserialising JSON payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic forwarding of any backend-specific error that doesn’t fit another
    /// category.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid: {0}")]
    Invalid(String),
}

impl GenerationError {
    /// Wrap any store-specific error as [`GenerationError::Persistence`].
    pub fn persistence(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        GenerationError::Persistence(err.into())
    }
}
