//! The `included` member: encoding of built sets and the decode-side index.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::codec::document::EncodeOptions;
use crate::codec::member::{
    expect_array, expect_object, item_path, member_path, value_kind, DecodeMember, EncodeMember,
    Member,
};
use crate::codec::resource::{DecodeNode, ResourceNode};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{check_decode_len, MAX_INCLUDED};
use crate::model::{Identity, IncludedSet, Relationship, Resource, Selector};

// =============================================================================
// ENCODE: INCLUDED SET
// =============================================================================

impl Member for IncludedSet {
    const PRESENT: bool = true;
}

impl EncodeMember for IncludedSet {
    fn encode_member(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        let nodes = if options.sort_included {
            self.sorted()
        } else {
            self.iter().collect()
        };
        let items = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| node.encode_node(&item_path(path, i), options).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Value::Array(items)))
    }
}

// =============================================================================
// DECODE: INCLUDED INDEX
// =============================================================================

/// Decode-side index over a document's `included` array.
///
/// Each element is keyed by its (type, id) prefix; the full payload stays
/// undecoded until a lookup asks for it as a concrete resource type. Every
/// lookup decodes afresh from the stored payload.
///
/// Unlike a [`Present`](crate::Present) member, a document type carrying an
/// `IncludedIndex` does not require `included` on the wire: a missing member
/// decodes as an empty index, and any lookup against it then fails with
/// [`DecodeError::MissingIncludedResource`]. A `null` or non-array value is
/// still rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludedIndex {
    entries: IndexMap<Identity, IndexEntry, FxBuildHasher>,
}

#[derive(Debug, Clone, PartialEq)]
struct IndexEntry {
    path: String,
    raw: Map<String, Value>,
}

impl IncludedIndex {
    /// Builds an index from the raw elements of an `included` array.
    ///
    /// Only `type` and `id` are read. Duplicate identities are rejected.
    pub fn from_values(items: Vec<Value>, path: &str) -> Result<Self, DecodeError> {
        Self::from_values_bounded(items, path, MAX_INCLUDED)
    }

    fn from_values_bounded(items: Vec<Value>, path: &str, max: usize) -> Result<Self, DecodeError> {
        check_decode_len("included", items.len(), max)?;

        let mut entries = IndexMap::with_capacity_and_hasher(items.len(), FxBuildHasher);
        for (i, item) in items.into_iter().enumerate() {
            let path = item_path(path, i);
            let raw = expect_object(item, &path)?;
            let identity = Identity::new(
                prefix_string(&raw, &path, "type")?,
                prefix_string(&raw, &path, "id")?,
            );
            if entries.contains_key(&identity) {
                return Err(DecodeError::DuplicateIncluded { path, identity });
            }
            entries.insert(identity, IndexEntry { path, raw });
        }

        debug!(count = entries.len(), "built included index");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Returns the identities in wire order.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.entries.keys()
    }

    /// Returns the undecoded payload stored for an identity.
    pub fn raw(&self, identity: &Identity) -> Option<&Map<String, Value>> {
        self.entries.get(identity).map(|entry| &entry.raw)
    }

    /// Decodes the resource stored for a typed id.
    pub fn get<T: DecodeNode>(
        &self,
        id: &<T::Resource as Resource>::Id,
    ) -> Result<Option<T>, DecodeError> {
        let identity = Identity::of::<T::Resource>(id);
        self.entries
            .get(&identity)
            .map(|entry| T::decode_node(entry.raw.clone(), &entry.path))
            .transpose()
    }

    /// Resolves the relationship selected by `via` on `from`.
    ///
    /// The result mirrors the relationship arity: `T` for to-one,
    /// `Option<T>` for nullable to-one (null never touches the index),
    /// `Vec<T>` for to-many, positionally.
    pub fn resolve<T, N, Rel>(
        &self,
        from: &N,
        via: &Selector<N, Rel>,
    ) -> Result<Rel::Resolved<T>, DecodeError>
    where
        T: DecodeNode<Resource = Rel::Target>,
        N: ResourceNode,
        Rel: Relationship,
    {
        let relationship = via.select(from);
        relationship.try_resolve(|id| {
            let identity = Identity::of::<Rel::Target>(id);
            match self.entries.get(&identity) {
                Some(entry) => {
                    trace!(%identity, relationship = via.name(), "decoding included resource");
                    T::decode_node(entry.raw.clone(), &entry.path)
                }
                None => Err(DecodeError::MissingIncludedResource {
                    referencing: from.identity(),
                    relationship: via.name(),
                    reference: relationship.reference(),
                    missing: identity,
                    path: member_path("relationships", via.name()),
                }),
            }
        })
    }

    /// Resolves `via` for every node of a slice, in order.
    pub fn resolve_each<T, N, Rel>(
        &self,
        from: &[N],
        via: &Selector<N, Rel>,
    ) -> Result<Vec<Rel::Resolved<T>>, DecodeError>
    where
        T: DecodeNode<Resource = Rel::Target>,
        N: ResourceNode,
        Rel: Relationship,
    {
        from.iter().map(|node| self.resolve::<T, _, _>(node, via)).collect()
    }

    /// Resolves `via` for an optional node; `None` yields `None`.
    pub fn resolve_optional<T, N, Rel>(
        &self,
        from: Option<&N>,
        via: &Selector<N, Rel>,
    ) -> Result<Option<Rel::Resolved<T>>, DecodeError>
    where
        T: DecodeNode<Resource = Rel::Target>,
        N: ResourceNode,
        Rel: Relationship,
    {
        from.map(|node| self.resolve::<T, _, _>(node, via)).transpose()
    }
}

fn prefix_string(
    raw: &Map<String, Value>,
    path: &str,
    member: &'static str,
) -> Result<String, DecodeError> {
    match raw.get(member) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(DecodeError::UnexpectedShape {
            path: member_path(path, member),
            expected: "string",
            found: value_kind(other),
        }),
        None => Err(DecodeError::MissingMember {
            path: path.to_string(),
            member,
        }),
    }
}

impl Member for IncludedIndex {
    const PRESENT: bool = true;
}

impl EncodeMember for IncludedIndex {
    fn encode_member(
        &self,
        _path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        if options.sort_included {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        let items = entries
            .into_iter()
            .map(|(_, entry)| Value::Object(entry.raw.clone()))
            .collect();
        Ok(Some(Value::Array(items)))
    }
}

impl DecodeMember for IncludedIndex {
    /// A missing `included` member yields an empty index.
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let path = member_path(parent, member);
        match value {
            Some(value) => Self::from_values(expect_array(value, &path)?, &path),
            None => Ok(Self::default()),
        }
    }
}
