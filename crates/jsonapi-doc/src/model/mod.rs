//! Data model types for JSON:API documents.
//!
//! This module contains the host-side shapes of a document:
//! - Identities and resource families
//! - Facet markers (present/absent members)
//! - Resource objects and relationships
//! - Error objects
//! - Documents and the compound builder

pub mod compound;
pub mod document;
pub mod error_object;
pub mod facet;
pub mod identity;
pub mod relationship;
pub mod resource;

pub use compound::{Compound, IncludedSet, Scope};
pub use document::{
    Document, FailableDocument, FailureDocument, FailureResponse, FailureSchema, JsonApiObject,
    SuccessDocument, JSONAPI_VERSION,
};
pub use error_object::ErrorObject;
pub use facet::{Absent, Present};
pub use identity::{Identity, Resource};
pub use relationship::{NullableToOne, Relationship, RelationshipRef, Selector, ToMany, ToOne};
pub use resource::{ResourceIdentifier, ResourceObject};
