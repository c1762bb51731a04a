//! Compound document assembly.
//!
//! A [`Compound`] starts from the primary data and walks relationships one
//! request at a time, calling a resolver for every referenced resource not
//! yet resolved. The accumulated [`IncludedSet`] holds at most one node per
//! identity; the first node inserted for an identity wins. Nested builds
//! started from a [`Scope`] share the record of resolved identities with the
//! build that spawned them.
//!
//! # Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use jsonapi_doc::{
//!     encode_document, Compound, Document, Present, Resource, ResourceObject, Selector, ToOne,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! struct Post;
//! impl Resource for Post { const TYPE: &'static str = "post"; type Id = u32; }
//! struct Author;
//! impl Resource for Author { const TYPE: &'static str = "author"; type Id = u32; }
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct PostRelationships { author: ToOne<Author> }
//!
//! type PostObject = ResourceObject<Post, jsonapi_doc::Absent, Present<PostRelationships>>;
//! type AuthorObject = ResourceObject<Author>;
//!
//! const AUTHOR: Selector<PostObject, ToOne<Author>> =
//!     Selector::new("author", |post| &post.relationships.author);
//!
//! let post: PostObject = ResourceObject::<Post>::new(1)
//!     .with_relationships(PostRelationships { author: ToOne::new(7) });
//!
//! let compound = Compound::new(post)
//!     .including(&AUTHOR, |id| Ok::<_, Infallible>(AuthorObject::new(*id)))
//!     .unwrap();
//! assert_eq!(compound.included().len(), 1);
//!
//! let json = encode_document(&Document::compound(compound)).unwrap();
//! assert!(json.contains(r#""included":[{"type":"author","id":"7"}]"#));
//! ```

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::{debug, trace};

use crate::codec::{IntoResourceObject, PrimaryData, ResourceNode, TypedNode};
use crate::error::BuildError;
use crate::limits::MAX_INCLUDED;
use crate::model::{Identity, Relationship, Resource, Selector};

type ResolverError = Box<dyn Error + Send + Sync>;

/// Identities resolved so far, shared by a build and its scoped nested builds.
type Resolved = Rc<RefCell<FxHashSet<Identity>>>;

/// Included resources accumulated during a compound build.
///
/// Keyed by identity, iterated in discovery order. Holds at most
/// [`MAX_INCLUDED`] nodes.
pub struct IncludedSet {
    nodes: IndexMap<Identity, Box<dyn ResourceNode>, FxBuildHasher>,
    limit: usize,
}

impl IncludedSet {
    pub fn new() -> Self {
        Self::with_limit(MAX_INCLUDED)
    }

    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            nodes: IndexMap::default(),
            limit,
        }
    }

    /// Inserts a node unless its identity is already present.
    ///
    /// Returns `Ok(true)` if the node was inserted. Fails once the set is
    /// full.
    pub fn insert_if_absent(&mut self, node: Box<dyn ResourceNode>) -> Result<bool, BuildError> {
        let identity = node.identity();
        if self.nodes.contains_key(&identity) {
            return Ok(false);
        }
        self.check_capacity()?;
        self.nodes.insert(identity, node);
        Ok(true)
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.nodes.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the identities in discovery order.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.nodes.keys()
    }

    /// Returns the nodes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ResourceNode> {
        self.nodes.values().map(|node| &**node)
    }

    /// Returns the nodes ordered by (type, id).
    pub fn sorted(&self) -> Vec<&dyn ResourceNode> {
        let mut entries: Vec<_> = self.nodes.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, node)| &**node).collect()
    }

    /// Moves every node of `other` into this set, first writer wins.
    pub fn merge(&mut self, other: IncludedSet) -> Result<(), BuildError> {
        for (identity, node) in other.nodes {
            if self.nodes.contains_key(&identity) {
                trace!(%identity, "merge skipped already included resource");
                continue;
            }
            self.check_capacity()?;
            self.nodes.insert(identity, node);
        }
        Ok(())
    }

    fn check_capacity(&self) -> Result<(), BuildError> {
        if self.nodes.len() >= self.limit {
            return Err(BuildError::LengthExceedsLimit {
                len: self.nodes.len() + 1,
                max: self.limit,
            });
        }
        Ok(())
    }
}

impl Default for IncludedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IncludedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.nodes.keys()).finish()
    }
}

/// Handle given to nested resolvers.
///
/// Compounds started from a scope share the enclosing build's record of
/// resolved identities. A resource reachable from several nested branches
/// is then resolved once, by the first branch that reaches it; later
/// branches skip it and the enclosing build already holds it.
#[derive(Debug, Clone)]
pub struct Scope {
    resolved: Resolved,
}

impl Scope {
    /// Starts a nested build over the given primary data.
    pub fn compound<Q: PrimaryData>(&self, data: Q) -> Compound<Q> {
        Compound {
            data,
            included: IncludedSet::new(),
            resolved: Rc::clone(&self.resolved),
        }
    }

    /// Starts a nested build over a single domain value.
    pub fn single<T>(&self, value: T) -> Compound<T::Object>
    where
        T: IntoResourceObject,
        T::Object: PrimaryData,
    {
        self.compound(value.into_resource_object())
    }

    /// Starts a nested build over a sequence of domain values.
    pub fn many<T>(&self, values: impl IntoIterator<Item = T>) -> Compound<Vec<T::Object>>
    where
        T: IntoResourceObject,
        Vec<T::Object>: PrimaryData,
    {
        self.compound(values.into_iter().map(T::into_resource_object).collect())
    }

    /// Returns true if the enclosing build has resolved or is resolving `identity`.
    pub fn is_resolved(&self, identity: &Identity) -> bool {
        self.resolved.borrow().contains(identity)
    }
}

/// Primary data plus the resources included so far.
#[derive(Debug)]
pub struct Compound<P> {
    data: P,
    included: IncludedSet,
    resolved: Resolved,
}

impl<P: PrimaryData> Compound<P> {
    /// Starts a build over the given primary data.
    pub fn new(data: P) -> Self {
        Self {
            data,
            included: IncludedSet::new(),
            resolved: Resolved::default(),
        }
    }

    /// Starts a build over a single domain value.
    pub fn single<T: IntoResourceObject<Object = P>>(value: T) -> Self {
        Self::new(value.into_resource_object())
    }

    pub fn data(&self) -> &P {
        &self.data
    }

    pub fn included(&self) -> &IncludedSet {
        &self.included
    }

    pub fn into_parts(self) -> (P, IncludedSet) {
        (self.data, self.included)
    }

    /// Includes every resource referenced through `via` from any root.
    ///
    /// Roots are visited in sequence order and each relationship's targets
    /// in reference order. `resolve` is called once per identity not already
    /// resolved; its first error aborts the build.
    pub fn including<Rel, T, E>(
        mut self,
        via: &Selector<P::Node, Rel>,
        mut resolve: impl FnMut(&<Rel::Target as Resource>::Id) -> Result<T, E>,
    ) -> Result<Self, BuildError>
    where
        Rel: Relationship,
        T: IntoResourceObject,
        T::Object: TypedNode<Resource = Rel::Target> + 'static,
        E: Into<ResolverError>,
    {
        for root in self.data.nodes() {
            for id in via.select(root).target_ids() {
                let identity = Identity::of::<Rel::Target>(id);
                if self.is_resolved(&identity) {
                    trace!(%identity, relationship = via.name(), "already resolved");
                    continue;
                }
                debug!(%identity, relationship = via.name(), "resolving included resource");
                let object = resolve(id)
                    .map_err(|source| BuildError::Resolver {
                        relationship: via.name(),
                        identity: identity.clone(),
                        source: source.into(),
                    })?
                    .into_resource_object();
                self.included.insert_if_absent(Box::new(object))?;
                self.resolved.borrow_mut().insert(identity);
            }
        }
        Ok(self)
    }

    /// Like [`Compound::including`], but a no-op when `condition` is false.
    pub fn including_if<Rel, T, E>(
        self,
        condition: bool,
        via: &Selector<P::Node, Rel>,
        resolve: impl FnMut(&<Rel::Target as Resource>::Id) -> Result<T, E>,
    ) -> Result<Self, BuildError>
    where
        Rel: Relationship,
        T: IntoResourceObject,
        T::Object: TypedNode<Resource = Rel::Target> + 'static,
        E: Into<ResolverError>,
    {
        if condition {
            self.including(via, resolve)
        } else {
            Ok(self)
        }
    }

    /// Includes referenced resources together with their own inclusions.
    ///
    /// `resolve` returns a nested compound per identity; its roots are
    /// merged first, then its included resources, both first writer wins.
    /// Nested builds started from the passed [`Scope`] skip identities this
    /// build has already resolved, so each identity is resolved once across
    /// all branches.
    pub fn including_nested<Rel, Q, E>(
        mut self,
        via: &Selector<P::Node, Rel>,
        mut resolve: impl FnMut(&<Rel::Target as Resource>::Id, &Scope) -> Result<Compound<Q>, E>,
    ) -> Result<Self, BuildError>
    where
        Rel: Relationship,
        Q: PrimaryData,
        Q::Node: TypedNode<Resource = Rel::Target>,
        E: Into<ResolverError>,
    {
        let scope = Scope {
            resolved: Rc::clone(&self.resolved),
        };
        for root in self.data.nodes() {
            for id in via.select(root).target_ids() {
                let identity = Identity::of::<Rel::Target>(id);
                if self.is_resolved(&identity) {
                    trace!(%identity, relationship = via.name(), "already resolved");
                    continue;
                }
                debug!(%identity, relationship = via.name(), "resolving nested compound");
                // Marked before resolving so nested references back to it are skipped.
                self.resolved.borrow_mut().insert(identity.clone());
                let nested = resolve(id, &scope).map_err(|source| BuildError::Resolver {
                    relationship: via.name(),
                    identity: identity.clone(),
                    source: source.into(),
                })?;
                let (data, included) = nested.into_parts();
                for node in data.into_nodes() {
                    self.resolved.borrow_mut().insert(node.identity());
                    self.included.insert_if_absent(Box::new(node))?;
                }
                self.resolved
                    .borrow_mut()
                    .extend(included.identities().cloned());
                self.included.merge(included)?;
            }
        }
        Ok(self)
    }

    /// Like [`Compound::including_nested`], but a no-op when `condition` is false.
    pub fn including_nested_if<Rel, Q, E>(
        self,
        condition: bool,
        via: &Selector<P::Node, Rel>,
        resolve: impl FnMut(&<Rel::Target as Resource>::Id, &Scope) -> Result<Compound<Q>, E>,
    ) -> Result<Self, BuildError>
    where
        Rel: Relationship,
        Q: PrimaryData,
        Q::Node: TypedNode<Resource = Rel::Target>,
        E: Into<ResolverError>,
    {
        if condition {
            self.including_nested(via, resolve)
        } else {
            Ok(self)
        }
    }

    fn is_resolved(&self, identity: &Identity) -> bool {
        self.included.contains(identity) || self.resolved.borrow().contains(identity)
    }
}

impl<N> Compound<Vec<N>>
where
    Vec<N>: PrimaryData,
{
    /// Starts a build over a sequence of domain values.
    pub fn many<T: IntoResourceObject<Object = N>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::new(values.into_iter().map(T::into_resource_object).collect())
    }
}

impl<N> Compound<Option<N>>
where
    Option<N>: PrimaryData,
{
    /// Starts a build over an optional domain value.
    pub fn nullable<T: IntoResourceObject<Object = N>>(value: Option<T>) -> Self {
        Self::new(value.map(T::into_resource_object))
    }
}
