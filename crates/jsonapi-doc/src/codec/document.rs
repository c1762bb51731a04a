//! Document envelope encoding/decoding.
//!
//! Encode writes members in the order data, errors, meta, jsonapi, links,
//! included, skipping statically absent slots.
//!
//! Decode peeks the raw object for an `errors` key before reading anything
//! else. A document carrying `errors` only decodes into a failure-shaped
//! type; the `data` member of such a document is never inspected.

use std::error::Error;
use std::fmt;

use serde_json::{Map, Value};

use crate::codec::data::PrimaryData;
use crate::codec::error_object::describe_errors;
use crate::codec::included::IncludedIndex;
use crate::codec::member::{
    expect_object, member_path, DecodeMember, EncodeMember, TextMember, ROOT,
};
use crate::codec::resource::{DecodeNode, ResourceNode};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{check_decode_len, MAX_DOCUMENT_SIZE};
use crate::model::{
    Absent, Document, ErrorObject, FailableDocument, FailureDocument, FailureSchema, Relationship,
    Selector, SuccessDocument,
};

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for document encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write `included` ordered by (type, id) instead of discovery order.
    pub sort_included: bool,
}

impl EncodeOptions {
    /// Creates default options (discovery order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with sorted inclusion enabled.
    pub fn sorted() -> Self {
        Self { sort_included: true }
    }
}

// =============================================================================
// DOCUMENT TRAITS
// =============================================================================

/// A document type that can be written as a JSON object.
pub trait EncodeDocument {
    fn encode_object(&self, options: &EncodeOptions) -> Result<Map<String, Value>, EncodeError>;
}

/// A document type that can be read from a JSON object.
pub trait DecodeDocument: Sized {
    fn decode_object(raw: Map<String, Value>) -> Result<Self, DecodeError>;
}

impl<D, E, M, J, L, I> EncodeDocument for Document<D, E, M, J, L, I>
where
    D: EncodeMember,
    E: EncodeMember,
    M: EncodeMember,
    J: EncodeMember,
    L: EncodeMember,
    I: EncodeMember,
{
    fn encode_object(&self, options: &EncodeOptions) -> Result<Map<String, Value>, EncodeError> {
        let mut map = Map::new();
        insert_member(&mut map, "data", self.data(), options)?;
        insert_member(&mut map, "errors", self.error_list(), options)?;
        insert_member(&mut map, "meta", self.meta(), options)?;
        insert_member(&mut map, "jsonapi", self.jsonapi(), options)?;
        insert_member(&mut map, "links", self.links(), options)?;
        insert_member(&mut map, "included", self.includes(), options)?;
        Ok(map)
    }
}

impl<D, E, M, J, L, I> DecodeDocument for Document<D, E, M, J, L, I>
where
    D: DecodeMember,
    E: DecodeMember,
    M: DecodeMember,
    J: DecodeMember,
    L: DecodeMember,
    I: DecodeMember,
{
    fn decode_object(mut raw: Map<String, Value>) -> Result<Self, DecodeError> {
        if D::PRESENT && E::PRESENT {
            return Err(DecodeError::DataErrorsConflict);
        }
        if raw.contains_key("errors") && !E::PRESENT {
            return Err(DecodeError::UnexpectedErrors);
        }

        let data = D::decode_member(raw.remove("data"), ROOT, "data")?;
        let errors = E::decode_member(raw.remove("errors"), ROOT, "errors")?;
        let meta = M::decode_member(raw.remove("meta"), ROOT, "meta")?;
        let jsonapi = J::decode_member(raw.remove("jsonapi"), ROOT, "jsonapi")?;
        let links = L::decode_member(raw.remove("links"), ROOT, "links")?;
        let included = I::decode_member(raw.remove("included"), ROOT, "included")?;

        Ok(Document::from_parts(data, errors, meta, jsonapi, links, included))
    }
}

impl<S, F> DecodeDocument for FailableDocument<S, F>
where
    S: SuccessDocument + DecodeDocument,
    F: FailureSchema,
    FailureDocument<S, F>: DecodeDocument,
{
    fn decode_object(raw: Map<String, Value>) -> Result<Self, DecodeError> {
        if raw.contains_key("errors") {
            <FailureDocument<S, F>>::decode_object(raw).map(FailableDocument::Failure)
        } else {
            S::decode_object(raw).map(FailableDocument::Success)
        }
    }
}

impl<S, F> EncodeDocument for FailableDocument<S, F>
where
    S: SuccessDocument + EncodeDocument,
    F: FailureSchema,
    FailureDocument<S, F>: EncodeDocument,
{
    fn encode_object(&self, options: &EncodeOptions) -> Result<Map<String, Value>, EncodeError> {
        match self {
            FailableDocument::Success(document) => document.encode_object(options),
            FailableDocument::Failure(document) => document.encode_object(options),
        }
    }
}

fn insert_member<T: EncodeMember>(
    map: &mut Map<String, Value>,
    member: &'static str,
    slot: &T,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    if let Some(value) = slot.encode_member(&member_path(ROOT, member), options)? {
        map.insert(member.to_string(), value);
    }
    Ok(())
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Encodes a document to a JSON string, included resources in discovery order.
pub fn encode_document<T: EncodeDocument>(document: &T) -> Result<String, EncodeError> {
    encode_document_with_options(document, &EncodeOptions::new())
}

/// Encodes a document to a JSON string with the given options.
pub fn encode_document_with_options<T: EncodeDocument>(
    document: &T,
    options: &EncodeOptions,
) -> Result<String, EncodeError> {
    let value = encode_document_value(document, options)?;
    serde_json::to_string(&value).map_err(|e| EncodeError::Serialize {
        path: "document".to_string(),
        message: e.to_string(),
    })
}

/// Encodes a document to a JSON value with the given options.
pub fn encode_document_value<T: EncodeDocument>(
    document: &T,
    options: &EncodeOptions,
) -> Result<Value, EncodeError> {
    document.encode_object(options).map(Value::Object)
}

/// Decodes a document from JSON text.
pub fn decode_document<T: DecodeDocument>(input: impl AsRef<[u8]>) -> Result<T, DecodeError> {
    decode_bounded(input.as_ref(), MAX_DOCUMENT_SIZE)
}

fn decode_bounded<T: DecodeDocument>(input: &[u8], max: usize) -> Result<T, DecodeError> {
    check_decode_len("document", input.len(), max)?;
    let value: Value =
        serde_json::from_slice(input).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    decode_document_value(value)
}

/// Decodes a document from an already parsed JSON value.
pub fn decode_document_value<T: DecodeDocument>(value: Value) -> Result<T, DecodeError> {
    let raw = expect_object(value, "document")?;
    T::decode_object(raw)
}

/// Decodes a response that is either success document `S` or its failure
/// counterpart under schema `F`.
pub fn decode_failable<S, F>(
    input: impl AsRef<[u8]>,
) -> Result<FailableDocument<S, F>, DecodeError>
where
    S: SuccessDocument + DecodeDocument,
    F: FailureSchema,
    FailureDocument<S, F>: DecodeDocument,
{
    decode_document(input)
}

// =============================================================================
// INCLUDED LOOKUPS
// =============================================================================

impl<D, E, M, J, L> Document<D, E, M, J, L, IncludedIndex> {
    /// Resolves `via` for every primary resource, keeping the data's shape.
    ///
    /// Single data yields one result, nullable data an `Option`, array data
    /// a `Vec` in data order.
    pub fn included<T, Rel>(
        &self,
        via: &Selector<D::Node, Rel>,
    ) -> Result<D::Mapped<Rel::Resolved<T>>, DecodeError>
    where
        D: PrimaryData,
        T: DecodeNode<Resource = Rel::Target>,
        Rel: Relationship,
    {
        let index = self.includes();
        self.data().try_map(|node| index.resolve::<T, _, _>(node, via))
    }

    /// Resolves `via` from any referencing node against this document's index.
    pub fn included_for<T, N, Rel>(
        &self,
        from: &N,
        via: &Selector<N, Rel>,
    ) -> Result<Rel::Resolved<T>, DecodeError>
    where
        T: DecodeNode<Resource = Rel::Target>,
        N: ResourceNode,
        Rel: Relationship,
    {
        self.includes().resolve::<T, _, _>(from, via)
    }

    /// Resolves `via` for each node of a slice.
    pub fn included_for_each<T, N, Rel>(
        &self,
        from: &[N],
        via: &Selector<N, Rel>,
    ) -> Result<Vec<Rel::Resolved<T>>, DecodeError>
    where
        T: DecodeNode<Resource = Rel::Target>,
        N: ResourceNode,
        Rel: Relationship,
    {
        self.includes().resolve_each::<T, _, _>(from, via)
    }

    /// Resolves `via` for an optional node.
    pub fn included_for_optional<T, N, Rel>(
        &self,
        from: Option<&N>,
        via: &Selector<N, Rel>,
    ) -> Result<Option<Rel::Resolved<T>>, DecodeError>
    where
        T: DecodeNode<Resource = Rel::Target>,
        N: ResourceNode,
        Rel: Relationship,
    {
        self.includes().resolve_optional::<T, _, _>(from, via)
    }
}

// =============================================================================
// FAILURE DOCUMENTS AS ERRORS
// =============================================================================

impl<I, Li, S, C, T, D, Src, Me, M, J> fmt::Display
    for Document<Absent, Vec<ErrorObject<I, Li, S, C, T, D, Src, Me>>, M, J>
where
    S: TextMember,
    C: TextMember,
    T: TextMember,
    D: TextMember,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe_errors(self.error_list(), f)
    }
}

impl<I, Li, S, C, T, D, Src, Me, M, J> Error
    for Document<Absent, Vec<ErrorObject<I, Li, S, C, T, D, Src, Me>>, M, J>
where
    I: fmt::Debug,
    Li: fmt::Debug,
    S: TextMember + fmt::Debug,
    C: TextMember + fmt::Debug,
    T: TextMember + fmt::Debug,
    D: TextMember + fmt::Debug,
    Src: fmt::Debug,
    Me: fmt::Debug,
    M: fmt::Debug,
    J: fmt::Debug,
{
}
