//! Top-level documents.
//!
//! A [`Document`] has six slots: data, errors, meta, jsonapi, links and
//! included. Each slot's type fixes whether the member exists: [`Absent`]
//! slots are never written or read. Exactly one of data and errors is
//! populated; the constructors enforce it.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::PrimaryData;
use crate::model::{Absent, Compound, IncludedSet, Present};

/// JSON:API version advertised by [`JsonApiObject::current`].
pub const JSONAPI_VERSION: &str = "1.1";

/// A JSON:API document.
///
/// - `D`: primary data (`ResourceObject`, `Option<..>`, `Vec<..>`) or [`Absent`]
/// - `E`: errors (`Vec<ErrorObject<..>>`) or [`Absent`]
/// - `M`, `J`, `L`: meta, jsonapi, links; [`Absent`] or [`Present<T>`]
/// - `I`: included; [`IncludedSet`] when built, `IncludedIndex` when decoded,
///   or [`Absent`]
#[derive(Debug, Clone, PartialEq)]
pub struct Document<D, E = Absent, M = Absent, J = Absent, L = Absent, I = Absent> {
    data: D,
    errors: E,
    meta: M,
    jsonapi: J,
    links: L,
    included: I,
}

impl<D: PrimaryData> Document<D> {
    /// Creates a success document with primary data only.
    pub fn new(data: D) -> Self {
        Self::from_parts(data, Absent, Absent, Absent, Absent, Absent)
    }
}

impl<P: PrimaryData> Document<P, Absent, Absent, Absent, Absent, IncludedSet> {
    /// Creates a success document from a finished compound build.
    pub fn compound(compound: Compound<P>) -> Self {
        let (data, included) = compound.into_parts();
        Self::from_parts(data, Absent, Absent, Absent, Absent, included)
    }
}

impl<X> Document<Absent, Vec<X>> {
    /// Creates a failure document.
    pub fn errors(errors: Vec<X>) -> Self {
        Self::from_parts(Absent, errors, Absent, Absent, Absent, Absent)
    }

    /// Creates a failure document with a single error.
    pub fn error(error: X) -> Self {
        Self::errors(vec![error])
    }
}

impl<D, E, M, J, L, I> Document<D, E, M, J, L, I> {
    pub(crate) fn from_parts(
        data: D,
        errors: E,
        meta: M,
        jsonapi: J,
        links: L,
        included: I,
    ) -> Self {
        Self {
            data,
            errors,
            meta,
            jsonapi,
            links,
            included,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn error_list(&self) -> &E {
        &self.errors
    }

    pub fn meta(&self) -> &M {
        &self.meta
    }

    pub fn jsonapi(&self) -> &J {
        &self.jsonapi
    }

    pub fn links(&self) -> &L {
        &self.links
    }

    pub fn includes(&self) -> &I {
        &self.included
    }

    pub fn into_data(self) -> D {
        self.data
    }

    pub fn into_errors(self) -> E {
        self.errors
    }

    /// Sets the document meta.
    pub fn with_meta<T>(self, meta: T) -> Document<D, E, Present<T>, J, L, I> {
        Document::from_parts(
            self.data,
            self.errors,
            Present(meta),
            self.jsonapi,
            self.links,
            self.included,
        )
    }

    /// Sets the `jsonapi` member.
    pub fn with_jsonapi<T>(self, jsonapi: T) -> Document<D, E, M, Present<T>, L, I> {
        Document::from_parts(
            self.data,
            self.errors,
            self.meta,
            Present(jsonapi),
            self.links,
            self.included,
        )
    }
}

impl<D, M, J, L, I> Document<D, Absent, M, J, L, I> {
    /// Sets the document links. Failure documents carry no links.
    pub fn with_links<T>(self, links: T) -> Document<D, Absent, M, J, Present<T>, I> {
        Document::from_parts(
            self.data,
            Absent,
            self.meta,
            self.jsonapi,
            Present(links),
            self.included,
        )
    }
}

// =============================================================================
// SUCCESS / FAILURE SCHEMAS
// =============================================================================

/// A document type that carries data, never errors.
pub trait SuccessDocument {
    /// The `jsonapi` slot, shared with the matching failure document.
    type JsonApi;
}

impl<D, M, J, L, I> SuccessDocument for Document<D, Absent, M, J, L, I> {
    type JsonApi = J;
}

/// Element and meta types used by a failure response.
pub trait FailureSchema {
    type Error;
    type Meta;
}

/// A failure response schema with error element `E` and meta `M`.
pub struct FailureResponse<E, M = Absent>(PhantomData<fn() -> (E, M)>);

impl<E, M> FailureSchema for FailureResponse<E, M> {
    type Error = E;
    type Meta = M;
}

/// The failure counterpart of success document `S` under schema `F`.
pub type FailureDocument<S, F> = Document<
    Absent,
    Vec<<F as FailureSchema>::Error>,
    <F as FailureSchema>::Meta,
    <S as SuccessDocument>::JsonApi,
>;

/// Either a success document or its failure counterpart, chosen on decode
/// by the presence of an `errors` member.
pub enum FailableDocument<S: SuccessDocument, F: FailureSchema> {
    Success(S),
    Failure(FailureDocument<S, F>),
}

impl<S: SuccessDocument, F: FailureSchema> FailableDocument<S, F> {
    pub fn is_success(&self) -> bool {
        matches!(self, FailableDocument::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FailableDocument::Failure(_))
    }

    pub fn into_result(self) -> Result<S, FailureDocument<S, F>> {
        match self {
            FailableDocument::Success(document) => Ok(document),
            FailableDocument::Failure(document) => Err(document),
        }
    }
}

impl<S, F> fmt::Debug for FailableDocument<S, F>
where
    S: SuccessDocument + fmt::Debug,
    F: FailureSchema,
    FailureDocument<S, F>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailableDocument::Success(document) => {
                f.debug_tuple("Success").field(document).finish()
            }
            FailableDocument::Failure(document) => {
                f.debug_tuple("Failure").field(document).finish()
            }
        }
    }
}

impl<S, F> Clone for FailableDocument<S, F>
where
    S: SuccessDocument + Clone,
    F: FailureSchema,
    FailureDocument<S, F>: Clone,
{
    fn clone(&self) -> Self {
        match self {
            FailableDocument::Success(document) => FailableDocument::Success(document.clone()),
            FailableDocument::Failure(document) => FailableDocument::Failure(document.clone()),
        }
    }
}

impl<S, F> PartialEq for FailableDocument<S, F>
where
    S: SuccessDocument + PartialEq,
    F: FailureSchema,
    FailureDocument<S, F>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FailableDocument::Success(a), FailableDocument::Success(b)) => a == b,
            (FailableDocument::Failure(a), FailableDocument::Failure(b)) => a == b,
            _ => false,
        }
    }
}

// =============================================================================
// JSONAPI OBJECT
// =============================================================================

/// The top-level `jsonapi` member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonApiObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl JsonApiObject {
    /// Returns a `jsonapi` member advertising [`JSONAPI_VERSION`].
    pub fn current() -> Self {
        Self {
            version: Some(JSONAPI_VERSION.to_string()),
            meta: None,
        }
    }
}
