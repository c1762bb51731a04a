//! Relationship references and selectors.
//!
//! A relationship names other resources by identity only. Three arities
//! exist, each with its own wire shape:
//!
//! | type | wire |
//! |---|---|
//! | [`ToOne<R>`] | `{"data": {"type": .., "id": ..}}` |
//! | [`NullableToOne<R>`] | `{"data": {"type": .., "id": ..}}` or `{"data": null}` |
//! | [`ToMany<R>`] | `{"data": [{"type": .., "id": ..}, ..]}` |

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::model::{Identity, Resource};

// =============================================================================
// WIRE SHAPES
// =============================================================================

#[derive(Serialize, Deserialize)]
struct Linkage {
    #[serde(rename = "type")]
    resource_type: String,
    id: String,
}

impl Linkage {
    fn of<R: Resource>(id: &R::Id) -> Self {
        Self {
            resource_type: R::TYPE.to_string(),
            id: id.to_string(),
        }
    }

    fn into_id<R: Resource, E: de::Error>(self) -> Result<R::Id, E> {
        if self.resource_type != R::TYPE {
            return Err(E::custom(format_args!(
                "linkage type mismatch: expected {:?}, found {:?}",
                R::TYPE,
                self.resource_type
            )));
        }
        self.id
            .parse()
            .map_err(|_| E::custom(format_args!("cannot convert linkage id {:?}", self.id)))
    }
}

#[derive(Serialize)]
struct LinkageOut<T> {
    data: T,
}

#[derive(Deserialize)]
struct LinkageIn<T> {
    data: T,
}

#[derive(Deserialize)]
struct NullableLinkageIn {
    #[serde(default)]
    data: Option<Linkage>,
}

// =============================================================================
// REFERENCE TYPES
// =============================================================================

/// A required reference to exactly one resource of family `R`.
pub struct ToOne<R: Resource> {
    pub id: R::Id,
}

/// An optional reference to one resource of family `R`.
pub struct NullableToOne<R: Resource> {
    pub id: Option<R::Id>,
}

/// An ordered, possibly empty list of references to resources of family `R`.
///
/// Duplicates are preserved.
pub struct ToMany<R: Resource> {
    pub ids: Vec<R::Id>,
}

impl<R: Resource> ToOne<R> {
    pub fn new(id: R::Id) -> Self {
        Self { id }
    }
}

impl<R: Resource> NullableToOne<R> {
    pub fn new(id: Option<R::Id>) -> Self {
        Self { id }
    }

    /// A reference that points nowhere.
    pub fn null() -> Self {
        Self { id: None }
    }
}

impl<R: Resource> ToMany<R> {
    pub fn new(ids: impl IntoIterator<Item = R::Id>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// A reference to no resources; written as `{"data": []}`.
    pub fn empty() -> Self {
        Self { ids: Vec::new() }
    }
}

// `R` is a marker; derives would demand `R: Debug + Clone + PartialEq`.
macro_rules! reference_impls {
    ($ty:ident, $field:ident) => {
        impl<R: Resource> fmt::Debug for $ty<R> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("type", &R::TYPE)
                    .field(stringify!($field), &self.$field)
                    .finish()
            }
        }

        impl<R: Resource> Clone for $ty<R> {
            fn clone(&self) -> Self {
                Self {
                    $field: self.$field.clone(),
                }
            }
        }

        impl<R: Resource> PartialEq for $ty<R> {
            fn eq(&self, other: &Self) -> bool {
                self.$field == other.$field
            }
        }
    };
}

reference_impls!(ToOne, id);
reference_impls!(NullableToOne, id);
reference_impls!(ToMany, ids);

impl<R: Resource> Serialize for ToOne<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LinkageOut {
            data: Linkage::of::<R>(&self.id),
        }
        .serialize(serializer)
    }
}

impl<'de, R: Resource> Deserialize<'de> for ToOne<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = LinkageIn::<Linkage>::deserialize(deserializer)?;
        Ok(Self {
            id: wire.data.into_id::<R, D::Error>()?,
        })
    }
}

impl<R: Resource> Serialize for NullableToOne<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LinkageOut {
            data: self.id.as_ref().map(Linkage::of::<R>),
        }
        .serialize(serializer)
    }
}

impl<'de, R: Resource> Deserialize<'de> for NullableToOne<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = NullableLinkageIn::deserialize(deserializer)?;
        let id = match wire.data {
            Some(linkage) => Some(linkage.into_id::<R, D::Error>()?),
            None => None,
        };
        Ok(Self { id })
    }
}

impl<R: Resource> Serialize for ToMany<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LinkageOut {
            data: self.ids.iter().map(Linkage::of::<R>).collect::<Vec<_>>(),
        }
        .serialize(serializer)
    }
}

impl<'de, R: Resource> Deserialize<'de> for ToMany<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = LinkageIn::<Vec<Linkage>>::deserialize(deserializer)?;
        let ids = wire
            .data
            .into_iter()
            .map(Linkage::into_id::<R, D::Error>)
            .collect::<Result<_, _>>()?;
        Ok(Self { ids })
    }
}

// =============================================================================
// ERASED REFERENCE
// =============================================================================

/// A relationship reference with its target type erased to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipRef {
    ToOne(Identity),
    NullableToOne(Option<Identity>),
    ToMany(Vec<Identity>),
}

impl RelationshipRef {
    /// Returns every identity referenced, in order.
    pub fn identities(&self) -> &[Identity] {
        match self {
            RelationshipRef::ToOne(identity) => std::slice::from_ref(identity),
            RelationshipRef::NullableToOne(identity) => identity.as_slice(),
            RelationshipRef::ToMany(identities) => identities,
        }
    }
}

impl fmt::Display for RelationshipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipRef::ToOne(identity) => write!(f, "{identity}"),
            RelationshipRef::NullableToOne(None) => f.write_str("null"),
            RelationshipRef::NullableToOne(Some(identity)) => write!(f, "{identity}"),
            RelationshipRef::ToMany(identities) => {
                f.write_str("[")?;
                for (i, identity) in identities.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{identity}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// =============================================================================
// RELATIONSHIP CAPABILITY
// =============================================================================

/// Common interface over the three reference arities.
///
/// `Resolved<T>` mirrors the arity: `T` for to-one, `Option<T>` for
/// nullable to-one, `Vec<T>` for to-many.
pub trait Relationship {
    /// The referenced resource family.
    type Target: Resource;

    /// Shape of a resolved reference.
    type Resolved<T>;

    /// Returns the type-erased reference.
    fn reference(&self) -> RelationshipRef;

    /// Returns the referenced ids in order.
    fn target_ids(&self) -> Vec<&<Self::Target as Resource>::Id>;

    /// Maps each referenced id through `f`, stopping at the first error.
    fn try_resolve<T, E>(
        &self,
        f: impl FnMut(&<Self::Target as Resource>::Id) -> Result<T, E>,
    ) -> Result<Self::Resolved<T>, E>;
}

impl<R: Resource> Relationship for ToOne<R> {
    type Target = R;
    type Resolved<T> = T;

    fn reference(&self) -> RelationshipRef {
        RelationshipRef::ToOne(Identity::of::<R>(&self.id))
    }

    fn target_ids(&self) -> Vec<&R::Id> {
        vec![&self.id]
    }

    fn try_resolve<T, E>(&self, mut f: impl FnMut(&R::Id) -> Result<T, E>) -> Result<T, E> {
        f(&self.id)
    }
}

impl<R: Resource> Relationship for NullableToOne<R> {
    type Target = R;
    type Resolved<T> = Option<T>;

    fn reference(&self) -> RelationshipRef {
        RelationshipRef::NullableToOne(self.id.as_ref().map(Identity::of::<R>))
    }

    fn target_ids(&self) -> Vec<&R::Id> {
        self.id.iter().collect()
    }

    fn try_resolve<T, E>(
        &self,
        f: impl FnMut(&R::Id) -> Result<T, E>,
    ) -> Result<Option<T>, E> {
        self.id.as_ref().map(f).transpose()
    }
}

impl<R: Resource> Relationship for ToMany<R> {
    type Target = R;
    type Resolved<T> = Vec<T>;

    fn reference(&self) -> RelationshipRef {
        RelationshipRef::ToMany(self.ids.iter().map(Identity::of::<R>).collect())
    }

    fn target_ids(&self) -> Vec<&R::Id> {
        self.ids.iter().collect()
    }

    fn try_resolve<T, E>(&self, f: impl FnMut(&R::Id) -> Result<T, E>) -> Result<Vec<T>, E> {
        self.ids.iter().map(f).collect()
    }
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Names one relationship of a resource node and reads it.
///
/// ```rust
/// # use jsonapi_doc::{Resource, ResourceObject, Present, Selector, ToOne};
/// # use serde::{Deserialize, Serialize};
/// struct User;
/// impl Resource for User { const TYPE: &'static str = "user"; type Id = u64; }
/// struct Image;
/// impl Resource for Image { const TYPE: &'static str = "image"; type Id = u64; }
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct UserRelationships { avatar: ToOne<Image> }
///
/// type UserObject = ResourceObject<User, jsonapi_doc::Absent, Present<UserRelationships>>;
///
/// const AVATAR: Selector<UserObject, ToOne<Image>> =
///     Selector::new("avatar", |user| &user.relationships.avatar);
/// ```
pub struct Selector<N, Rel> {
    name: &'static str,
    get: for<'a> fn(&'a N) -> &'a Rel,
}

impl<N, Rel> Selector<N, Rel> {
    pub const fn new(name: &'static str, get: for<'a> fn(&'a N) -> &'a Rel) -> Self {
        Self { name, get }
    }

    /// The relationship's member name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the relationship from a node.
    pub fn select<'a>(&self, node: &'a N) -> &'a Rel {
        (self.get)(node)
    }
}

impl<N, Rel> Clone for Selector<N, Rel> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, Rel> Copy for Selector<N, Rel> {}

impl<N, Rel> fmt::Debug for Selector<N, Rel> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Image;

    impl Resource for Image {
        const TYPE: &'static str = "image";
        type Id = u32;
    }

    #[test]
    fn test_to_one_wire_shape() {
        let rel = ToOne::<Image>::new(7);
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({"data": {"type": "image", "id": "7"}})
        );
        let back: ToOne<Image> =
            serde_json::from_value(json!({"data": {"type": "image", "id": "7"}})).unwrap();
        assert_eq!(back, rel);
    }

    #[test]
    fn test_nullable_null_and_missing() {
        let rel = NullableToOne::<Image>::null();
        assert_eq!(serde_json::to_value(&rel).unwrap(), json!({"data": null}));

        let from_null: NullableToOne<Image> =
            serde_json::from_value(json!({"data": null})).unwrap();
        assert_eq!(from_null.id, None);
        let from_missing: NullableToOne<Image> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(from_missing.id, None);
    }

    #[test]
    fn test_to_many_rejects_null() {
        let result = serde_json::from_value::<ToMany<Image>>(json!({"data": null}));
        assert!(result.is_err());
        let empty: ToMany<Image> = serde_json::from_value(json!({"data": []})).unwrap();
        assert!(empty.ids.is_empty());
    }

    #[test]
    fn test_linkage_type_mismatch() {
        let input = json!({"data": {"type": "user", "id": "7"}});
        let err = serde_json::from_value::<ToOne<Image>>(input).unwrap_err();
        assert!(err.to_string().contains("linkage type mismatch"));
    }

    #[test]
    fn test_erased_reference() {
        let rel = ToMany::<Image>::new([3, 1, 3]);
        let reference = rel.reference();
        assert_eq!(reference.identities().len(), 3);
        assert_eq!(reference.to_string(), "[image:3, image:1, image:3]");

        let resolved = rel.try_resolve(|id| Ok::<_, ()>(id * 10)).unwrap();
        assert_eq!(resolved, vec![30, 10, 30]);
    }

    #[test]
    fn test_nullable_resolve_skips_callback() {
        let rel = NullableToOne::<Image>::null();
        let resolved = rel
            .try_resolve(|_| -> Result<u32, ()> { panic!("must not be called") })
            .unwrap();
        assert_eq!(resolved, None);
    }
}
