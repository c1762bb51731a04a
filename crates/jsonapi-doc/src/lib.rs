//! jsonapi-doc: typed JSON:API documents with compound inclusion.
//!
//! This crate provides encoding and decoding of JSON:API-style documents
//! whose shape is fixed by Rust types.
//!
//! # Overview
//!
//! - **Typed members**: every facet and side member is statically present
//!   ([`Present<T>`]) or absent ([`Absent`]); absent members are never
//!   written or read
//! - **Compound documents**: [`Compound`] walks relationships and collects
//!   related resources into one deduplicated `included` list
//! - **Included lookups**: decoded documents keep `included` as an
//!   [`IncludedIndex`] and resolve relationships against it on demand
//! - **Failable responses**: [`FailableDocument`] picks the success or
//!   failure shape by peeking for an `errors` member
//!
//! # Quick Start
//!
//! ```rust
//! use jsonapi_doc::{
//!     decode_document, encode_document, Absent, Compound, Document, IncludedIndex, Present,
//!     Resource, ResourceObject, Selector, ToOne,
//! };
//! use serde::{Deserialize, Serialize};
//! use std::convert::Infallible;
//!
//! struct Article;
//! impl Resource for Article { const TYPE: &'static str = "article"; type Id = u64; }
//! struct Person;
//! impl Resource for Person { const TYPE: &'static str = "person"; type Id = u64; }
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct ArticleAttributes { title: String }
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct ArticleRelationships { author: ToOne<Person> }
//!
//! type ArticleObject =
//!     ResourceObject<Article, Present<ArticleAttributes>, Present<ArticleRelationships>>;
//! type PersonObject = ResourceObject<Person>;
//!
//! const AUTHOR: Selector<ArticleObject, ToOne<Person>> =
//!     Selector::new("author", |article| &article.relationships.author);
//!
//! let article: ArticleObject = ResourceObject::<Article>::new(1)
//!     .with_attributes(ArticleAttributes { title: "Hello".into() })
//!     .with_relationships(ArticleRelationships { author: ToOne::new(9) });
//!
//! // Encode with the author included
//! let compound = Compound::new(article)
//!     .including(&AUTHOR, |id| Ok::<_, Infallible>(PersonObject::new(*id)))
//!     .unwrap();
//! let json = encode_document(&Document::compound(compound)).unwrap();
//!
//! // Decode and resolve the author from `included`
//! type ArticleDocument = Document<ArticleObject, Absent, Absent, Absent, Absent, IncludedIndex>;
//! let decoded: ArticleDocument = decode_document(&json).unwrap();
//! let author: PersonObject = decoded.included(&AUTHOR).unwrap();
//! assert_eq!(author.id, 9);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Documents, resource objects, relationships, error objects,
//!   the compound builder
//! - [`codec`]: JSON encoding/decoding and the included index
//! - [`error`]: Error types
//! - [`limits`]: Safety limits for decoding
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Document size and array lengths are bounded by [`limits`]
//! - Duplicate identities in `included` are rejected
//! - Invalid data is rejected with descriptive errors carrying the member path

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{
    decode_document, decode_document_value, decode_failable, encode_document,
    encode_document_value, encode_document_with_options, DecodeDocument, DecodeNode,
    EncodeDocument, EncodeOptions, IncludedIndex, IntoResourceObject, PrimaryData, ResourceNode,
    TypedNode,
};
pub use error::{BuildError, DecodeError, EncodeError, ErrorKind};
pub use model::{
    Absent, Compound, Document, ErrorObject, FailableDocument, FailureDocument, FailureResponse,
    FailureSchema, Identity, IncludedSet, JsonApiObject, NullableToOne, Present, Relationship,
    RelationshipRef, Resource, ResourceIdentifier, ResourceObject, Scope, Selector,
    SuccessDocument, ToMany, ToOne, JSONAPI_VERSION,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
