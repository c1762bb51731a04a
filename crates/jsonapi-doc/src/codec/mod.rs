//! JSON encoding/decoding for documents.
//!
//! Members are converted through `serde_json::Value`; each document slot's
//! type decides through the [`member`] traits whether it is written and
//! read at all.

pub mod data;
pub mod document;
pub mod error_object;
pub mod included;
pub mod member;
pub mod resource;

pub use data::PrimaryData;
pub use document::{
    decode_document, decode_document_value, decode_failable, encode_document,
    encode_document_value, encode_document_with_options, DecodeDocument, EncodeDocument,
    EncodeOptions,
};
pub use included::IncludedIndex;
pub use member::{DecodeMember, EncodeMember, Member, TextMember};
pub use resource::{DecodeNode, IntoResourceObject, ResourceNode, TypedNode};
