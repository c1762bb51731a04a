//! Resource objects.
//!
//! A resource object is an id of some [`Resource`] family plus four facets.
//! Each facet is either [`Absent`] or [`Present<T>`], fixed per
//! instantiation:
//!
//! ```rust
//! use jsonapi_doc::{Absent, Present, Resource, ResourceObject};
//!
//! struct Image;
//! impl Resource for Image {
//!     const TYPE: &'static str = "image";
//!     type Id = u32;
//! }
//!
//! #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct ImageAttributes {
//!     url: String,
//! }
//!
//! let image: ResourceObject<Image, Present<ImageAttributes>> = ResourceObject::<Image>::new(1)
//!     .with_attributes(ImageAttributes { url: "https://example.com/1.png".into() });
//! assert_eq!(image.attributes.url, "https://example.com/1.png");
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::model::{Absent, Identity, Present, Resource};

/// A typed resource object with facets `A` (attributes), `Rel`
/// (relationships), `L` (links) and `M` (meta).
pub struct ResourceObject<R: Resource, A = Absent, Rel = Absent, L = Absent, M = Absent> {
    pub id: R::Id,
    pub attributes: A,
    pub relationships: Rel,
    pub links: L,
    pub meta: M,
    resource: PhantomData<fn() -> R>,
}

/// A resource object with every facet absent: just `type` and `id`.
pub type ResourceIdentifier<R> = ResourceObject<R>;

impl<R: Resource> ResourceObject<R> {
    /// Creates a resource object with every facet absent.
    pub fn new(id: R::Id) -> Self {
        Self::from_parts(id, Absent, Absent, Absent, Absent)
    }

    /// Same as [`ResourceObject::new`]; reads better for bare identifiers.
    pub fn identifier(id: R::Id) -> ResourceIdentifier<R> {
        Self::new(id)
    }
}

impl<R: Resource, A, Rel, L, M> ResourceObject<R, A, Rel, L, M> {
    /// Creates a resource object from already-wrapped facets.
    pub fn from_parts(id: R::Id, attributes: A, relationships: Rel, links: L, meta: M) -> Self {
        Self {
            id,
            attributes,
            relationships,
            links,
            meta,
            resource: PhantomData,
        }
    }

    /// Returns the (type, id) identity.
    pub fn identity(&self) -> Identity {
        Identity::of::<R>(&self.id)
    }

    /// Replaces the attributes facet with a present value.
    pub fn with_attributes<T>(self, attributes: T) -> ResourceObject<R, Present<T>, Rel, L, M> {
        ResourceObject::from_parts(
            self.id,
            Present(attributes),
            self.relationships,
            self.links,
            self.meta,
        )
    }

    /// Replaces the relationships facet with a present value.
    pub fn with_relationships<T>(self, relationships: T) -> ResourceObject<R, A, Present<T>, L, M> {
        ResourceObject::from_parts(
            self.id,
            self.attributes,
            Present(relationships),
            self.links,
            self.meta,
        )
    }

    /// Replaces the links facet with a present value.
    pub fn with_links<T>(self, links: T) -> ResourceObject<R, A, Rel, Present<T>, M> {
        ResourceObject::from_parts(
            self.id,
            self.attributes,
            self.relationships,
            Present(links),
            self.meta,
        )
    }

    /// Replaces the meta facet with a present value.
    pub fn with_meta<T>(self, meta: T) -> ResourceObject<R, A, Rel, L, Present<T>> {
        ResourceObject::from_parts(
            self.id,
            self.attributes,
            self.relationships,
            self.links,
            Present(meta),
        )
    }
}

impl<R: Resource, A: fmt::Debug, Rel: fmt::Debug, L: fmt::Debug, M: fmt::Debug> fmt::Debug
    for ResourceObject<R, A, Rel, L, M>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceObject")
            .field("type", &R::TYPE)
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("relationships", &self.relationships)
            .field("links", &self.links)
            .field("meta", &self.meta)
            .finish()
    }
}

impl<R, A, Rel, L, M> Clone for ResourceObject<R, A, Rel, L, M>
where
    R: Resource,
    A: Clone,
    Rel: Clone,
    L: Clone,
    M: Clone,
{
    fn clone(&self) -> Self {
        Self::from_parts(
            self.id.clone(),
            self.attributes.clone(),
            self.relationships.clone(),
            self.links.clone(),
            self.meta.clone(),
        )
    }
}

impl<R: Resource, A: PartialEq, Rel: PartialEq, L: PartialEq, M: PartialEq> PartialEq
    for ResourceObject<R, A, Rel, L, M>
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.attributes == other.attributes
            && self.relationships == other.relationships
            && self.links == other.links
            && self.meta == other.meta
    }
}
