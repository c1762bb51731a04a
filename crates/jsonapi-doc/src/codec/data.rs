//! Primary data shapes.
//!
//! The `data` member holds one of three shapes, fixed by the document type:
//!
//! | host type | wire |
//! |---|---|
//! | `ResourceObject<..>` | resource object |
//! | `Option<ResourceObject<..>>` | resource object or `null` |
//! | `Vec<ResourceObject<..>>` | array, possibly `[]` |

use serde_json::Value;

use crate::codec::document::EncodeOptions;
use crate::codec::member::{
    expect_array, expect_object, item_path, member_path, require, value_kind, DecodeMember,
    EncodeMember, Member,
};
use crate::codec::resource::{DecodeNode, ResourceNode};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{check_decode_len, check_encode_len, MAX_PRIMARY_RESOURCES};
use crate::model::{Resource, ResourceObject};

/// A `data` slot holding resource nodes.
///
/// `Mapped<T>` has the same shape with each node replaced by a `T`.
pub trait PrimaryData: EncodeMember {
    type Node: ResourceNode + 'static;
    type Mapped<T>;

    /// Returns the root nodes in sequence order.
    fn nodes(&self) -> Vec<&Self::Node>;

    /// Consumes the data, returning the root nodes in sequence order.
    fn into_nodes(self) -> Vec<Self::Node>;

    /// Maps every node through `f`, preserving the shape.
    fn try_map<T, E>(
        &self,
        f: impl FnMut(&Self::Node) -> Result<T, E>,
    ) -> Result<Self::Mapped<T>, E>;
}

// =============================================================================
// SINGLE
// =============================================================================

impl<R: Resource, A, Rel, L, M> Member for ResourceObject<R, A, Rel, L, M> {
    const PRESENT: bool = true;
}

impl<R, A, Rel, L, M> EncodeMember for ResourceObject<R, A, Rel, L, M>
where
    Self: ResourceNode,
    R: Resource,
{
    fn encode_member(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        self.encode_node(path, options).map(|map| Some(Value::Object(map)))
    }
}

impl<R, A, Rel, L, M> DecodeMember for ResourceObject<R, A, Rel, L, M>
where
    Self: DecodeNode,
    R: Resource,
{
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let path = member_path(parent, member);
        let raw = expect_object(require(value, parent, member)?, &path)?;
        Self::decode_node(raw, &path)
    }
}

impl<R, A, Rel, L, M> PrimaryData for ResourceObject<R, A, Rel, L, M>
where
    Self: ResourceNode + 'static,
    R: Resource,
{
    type Node = Self;
    type Mapped<T> = T;

    fn nodes(&self) -> Vec<&Self> {
        vec![self]
    }

    fn into_nodes(self) -> Vec<Self> {
        vec![self]
    }

    fn try_map<T, E>(&self, mut f: impl FnMut(&Self) -> Result<T, E>) -> Result<T, E> {
        f(self)
    }
}

// =============================================================================
// NULLABLE SINGLE
// =============================================================================

impl<R: Resource, A, Rel, L, M> Member for Option<ResourceObject<R, A, Rel, L, M>> {
    const PRESENT: bool = true;
}

impl<R, A, Rel, L, M> EncodeMember for Option<ResourceObject<R, A, Rel, L, M>>
where
    ResourceObject<R, A, Rel, L, M>: ResourceNode,
    R: Resource,
{
    fn encode_member(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        match self {
            Some(node) => node.encode_node(path, options).map(|map| Some(Value::Object(map))),
            None => Ok(Some(Value::Null)),
        }
    }
}

impl<R, A, Rel, L, M> DecodeMember for Option<ResourceObject<R, A, Rel, L, M>>
where
    ResourceObject<R, A, Rel, L, M>: DecodeNode,
    R: Resource,
{
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let path = member_path(parent, member);
        match require(value, parent, member)? {
            Value::Null => Ok(None),
            Value::Object(raw) => ResourceObject::decode_node(raw, &path).map(Some),
            other => Err(DecodeError::UnexpectedShape {
                path,
                expected: "object or null",
                found: value_kind(&other),
            }),
        }
    }
}

impl<R, A, Rel, L, M> PrimaryData for Option<ResourceObject<R, A, Rel, L, M>>
where
    ResourceObject<R, A, Rel, L, M>: ResourceNode + 'static,
    R: Resource,
{
    type Node = ResourceObject<R, A, Rel, L, M>;
    type Mapped<T> = Option<T>;

    fn nodes(&self) -> Vec<&Self::Node> {
        self.iter().collect()
    }

    fn into_nodes(self) -> Vec<Self::Node> {
        self.into_iter().collect()
    }

    fn try_map<T, E>(
        &self,
        f: impl FnMut(&Self::Node) -> Result<T, E>,
    ) -> Result<Option<T>, E> {
        self.as_ref().map(f).transpose()
    }
}

// =============================================================================
// ARRAY
// =============================================================================

impl<R: Resource, A, Rel, L, M> Member for Vec<ResourceObject<R, A, Rel, L, M>> {
    const PRESENT: bool = true;
}

impl<R, A, Rel, L, M> EncodeMember for Vec<ResourceObject<R, A, Rel, L, M>>
where
    ResourceObject<R, A, Rel, L, M>: ResourceNode,
    R: Resource,
{
    fn encode_member(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        encode_nodes(self, path, options, MAX_PRIMARY_RESOURCES).map(Some)
    }
}

impl<R, A, Rel, L, M> DecodeMember for Vec<ResourceObject<R, A, Rel, L, M>>
where
    ResourceObject<R, A, Rel, L, M>: DecodeNode,
    R: Resource,
{
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let path = member_path(parent, member);
        let items = expect_array(require(value, parent, member)?, &path)?;
        decode_nodes(items, &path, MAX_PRIMARY_RESOURCES)
    }
}

fn encode_nodes<N: ResourceNode>(
    nodes: &[N],
    path: &str,
    options: &EncodeOptions,
    max: usize,
) -> Result<Value, EncodeError> {
    check_encode_len("data", nodes.len(), max)?;
    let items = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| node.encode_node(&item_path(path, i), options).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}

fn decode_nodes<N: DecodeNode>(
    items: Vec<Value>,
    path: &str,
    max: usize,
) -> Result<Vec<N>, DecodeError> {
    check_decode_len("data", items.len(), max)?;
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let at = item_path(path, i);
            let raw = expect_object(item, &at)?;
            N::decode_node(raw, &at)
        })
        .collect()
}

impl<R, A, Rel, L, M> PrimaryData for Vec<ResourceObject<R, A, Rel, L, M>>
where
    ResourceObject<R, A, Rel, L, M>: ResourceNode + 'static,
    R: Resource,
{
    type Node = ResourceObject<R, A, Rel, L, M>;
    type Mapped<T> = Vec<T>;

    fn nodes(&self) -> Vec<&Self::Node> {
        self.iter().collect()
    }

    fn into_nodes(self) -> Vec<Self::Node> {
        self
    }

    fn try_map<T, E>(&self, f: impl FnMut(&Self::Node) -> Result<T, E>) -> Result<Vec<T>, E> {
        self.iter().map(f).collect()
    }
}
