//! Resource families and composite identities.
//!
//! Every resource in a document is named by its (type, id) pair. Both parts
//! travel as strings on the wire; the host side converts ids losslessly via
//! `FromStr`/`Display`.

use std::fmt;
use std::str::FromStr;

/// A resource family: a type tag plus the host type of its identifiers.
///
/// Two resources have the same type iff their `TYPE` strings are equal.
pub trait Resource {
    /// Canonical type string, written as the `type` member.
    const TYPE: &'static str;

    /// Identifier type, unique within this resource type.
    type Id: FromStr + fmt::Display + fmt::Debug + Clone + PartialEq;
}

/// The (type, id) composite key that names a resource across a document.
///
/// Ordering compares the type string first, then the id string, both
/// byte-lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    resource_type: String,
    id: String,
}

impl Identity {
    /// Creates an identity from raw type and id strings.
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates the identity of a typed resource id.
    pub fn of<R: Resource + ?Sized>(id: &R::Id) -> Self {
        Self::new(R::TYPE, id.to_string())
    }

    /// Returns the type string.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the id string.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if this identity names a resource of family `R`.
    pub fn is<R: Resource + ?Sized>(&self) -> bool {
        self.resource_type == R::TYPE
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}
