//! Error types for document encoding, decoding and compound assembly.

use thiserror::Error;

use crate::model::{Identity, RelationshipRef};

/// Error kinds shared by every error type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// E001: decoded `type` does not match the expected resource type
    TypeMismatch,
    /// E002: `id` or error field string could not be converted
    MalformedIdentifier,
    /// E003: relationship target not present in `included`
    MissingIncludedResource,
    /// E004: missing member, wrong shape, limits, data/errors ambiguity
    StructuralDecode,
    /// E005: a compound resolver callback failed
    ResolverFailure,
}

impl ErrorKind {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "E001",
            ErrorKind::MalformedIdentifier => "E002",
            ErrorKind::MissingIncludedResource => "E003",
            ErrorKind::StructuralDecode => "E004",
            ErrorKind::ResolverFailure => "E005",
        }
    }
}

/// Error during document decoding or included-resource lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Type mismatch ===
    #[error("[E001] {path}: resource type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    // === E002: Malformed identifier ===
    #[error("[E002] {path}: cannot convert {value:?} for field {field}")]
    MalformedIdentifier {
        path: String,
        field: &'static str,
        value: String,
    },

    // === E003: Missing included resource ===
    #[error("[E003] included resource {missing} not found (referenced by {referencing} via {path})")]
    MissingIncludedResource {
        referencing: Identity,
        relationship: &'static str,
        reference: RelationshipRef,
        missing: Identity,
        path: String,
    },

    // === E004: Structural ===
    #[error("[E004] invalid JSON: {0}")]
    InvalidJson(String),

    #[error("[E004] {path}: expected {expected}, found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("[E004] {path}: missing required member {member:?}")]
    MissingMember { path: String, member: &'static str },

    #[error("[E004] {path}: {message}")]
    InvalidMember { path: String, message: String },

    #[error("[E004] {path}: duplicate included resource {identity}")]
    DuplicateIncluded { path: String, identity: Identity },

    #[error("[E004] document carries an errors member but was decoded as a success document")]
    UnexpectedErrors,

    #[error("[E004] document schema declares both data and errors")]
    DataErrorsConflict,

    #[error("[E004] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl DecodeError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DecodeError::MalformedIdentifier { .. } => ErrorKind::MalformedIdentifier,
            DecodeError::MissingIncludedResource { .. } => ErrorKind::MissingIncludedResource,
            _ => ErrorKind::StructuralDecode,
        }
    }
}

/// Error during document encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{path}: serialization failed: {message}")]
    Serialize { path: String, message: String },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Error during compound document assembly.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("[E005] resolver for {identity} via {relationship:?} failed: {source}")]
    Resolver {
        relationship: &'static str,
        identity: Identity,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("[E004] included length {len} exceeds maximum {max}")]
    LengthExceedsLimit { len: usize, max: usize },
}

impl BuildError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Resolver { .. } => ErrorKind::ResolverFailure,
            BuildError::LengthExceedsLimit { .. } => ErrorKind::StructuralDecode,
        }
    }
}
