//! Resource node capabilities and the resource object wire form.
//!
//! The compound builder and the included index only see resources through
//! these traits:
//!
//! - [`ResourceNode`]: identity + encoding, object safe (erased into
//!   the included accumulator)
//! - [`TypedNode`]: typed id access for relationship traversal
//! - [`DecodeNode`]: decoding from a keyed wire object

use serde_json::{Map, Value};

use crate::codec::document::EncodeOptions;
use crate::codec::member::{member_path, take_string, DecodeMember, EncodeMember};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Identity, Resource, ResourceObject};

/// A resource that can name itself and write its wire form.
pub trait ResourceNode {
    /// Returns the (type, id) identity.
    fn identity(&self) -> Identity;

    /// Encodes the resource as a keyed object in member order type, id,
    /// attributes, relationships, links, meta.
    fn encode_node(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Map<String, Value>, EncodeError>;
}

/// A resource node with a statically known family.
pub trait TypedNode: ResourceNode {
    type Resource: Resource;

    fn id(&self) -> &<Self::Resource as Resource>::Id;
}

/// A typed resource node that can be read back from its wire form.
pub trait DecodeNode: TypedNode + Sized {
    /// Decodes a keyed resource object found at `path`.
    fn decode_node(raw: Map<String, Value>, path: &str) -> Result<Self, DecodeError>;
}

/// Conversion from domain values into resource objects.
///
/// Lets compound builders and resolvers hand back domain values directly.
pub trait IntoResourceObject {
    type Object: TypedNode;

    fn into_resource_object(self) -> Self::Object;
}

impl<R, A, Rel, L, M> ResourceNode for ResourceObject<R, A, Rel, L, M>
where
    R: Resource,
    A: EncodeMember,
    Rel: EncodeMember,
    L: EncodeMember,
    M: EncodeMember,
{
    fn identity(&self) -> Identity {
        Identity::of::<R>(&self.id)
    }

    fn encode_node(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Map<String, Value>, EncodeError> {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(R::TYPE.to_string()));
        map.insert("id".to_string(), Value::String(self.id.to_string()));
        insert_facet(&mut map, path, "attributes", &self.attributes, options)?;
        insert_facet(&mut map, path, "relationships", &self.relationships, options)?;
        insert_facet(&mut map, path, "links", &self.links, options)?;
        insert_facet(&mut map, path, "meta", &self.meta, options)?;
        Ok(map)
    }
}

impl<R, A, Rel, L, M> TypedNode for ResourceObject<R, A, Rel, L, M>
where
    R: Resource,
    A: EncodeMember,
    Rel: EncodeMember,
    L: EncodeMember,
    M: EncodeMember,
{
    type Resource = R;

    fn id(&self) -> &R::Id {
        &self.id
    }
}

impl<R, A, Rel, L, M> DecodeNode for ResourceObject<R, A, Rel, L, M>
where
    R: Resource,
    A: EncodeMember + DecodeMember,
    Rel: EncodeMember + DecodeMember,
    L: EncodeMember + DecodeMember,
    M: EncodeMember + DecodeMember,
{
    fn decode_node(mut raw: Map<String, Value>, path: &str) -> Result<Self, DecodeError> {
        let resource_type = take_string(&mut raw, path, "type")?;
        if resource_type != R::TYPE {
            return Err(DecodeError::TypeMismatch {
                path: member_path(path, "type"),
                expected: R::TYPE,
                found: resource_type,
            });
        }

        let id_text = take_string(&mut raw, path, "id")?;
        let id = match id_text.parse() {
            Ok(id) => id,
            Err(_) => {
                return Err(DecodeError::MalformedIdentifier {
                    path: member_path(path, "id"),
                    field: "id",
                    value: id_text,
                });
            }
        };

        let attributes = A::decode_member(raw.remove("attributes"), path, "attributes")?;
        let relationships = Rel::decode_member(raw.remove("relationships"), path, "relationships")?;
        let links = L::decode_member(raw.remove("links"), path, "links")?;
        let meta = M::decode_member(raw.remove("meta"), path, "meta")?;

        Ok(ResourceObject::from_parts(id, attributes, relationships, links, meta))
    }
}

impl<R, A, Rel, L, M> IntoResourceObject for ResourceObject<R, A, Rel, L, M>
where
    Self: TypedNode,
    R: Resource,
{
    type Object = Self;

    fn into_resource_object(self) -> Self {
        self
    }
}

fn insert_facet<F: EncodeMember>(
    map: &mut Map<String, Value>,
    path: &str,
    member: &'static str,
    facet: &F,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    if let Some(value) = facet.encode_member(&member_path(path, member), options)? {
        map.insert(member.to_string(), value);
    }
    Ok(())
}
