//! Error object encoding/decoding.
//!
//! Wire form: a keyed object with up to eight members written in the order
//! id, links, status, code, title, detail, source, meta.

use std::fmt;

use serde_json::{Map, Value};

use crate::codec::document::EncodeOptions;
use crate::codec::member::{
    expect_array, expect_object, item_path, member_path, require, DecodeMember, EncodeMember,
    Member, TextMember,
};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{check_decode_len, check_encode_len, MAX_ERRORS};
use crate::model::ErrorObject;

impl<I, L, S, C, T, D, Src, M> ErrorObject<I, L, S, C, T, D, Src, M>
where
    I: TextMember,
    L: EncodeMember,
    S: TextMember,
    C: TextMember,
    T: TextMember,
    D: TextMember,
    Src: EncodeMember,
    M: EncodeMember,
{
    fn encode_object(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Map<String, Value>, EncodeError> {
        let mut map = Map::new();
        insert_text(&mut map, "id", &self.id);
        insert_value(&mut map, path, "links", &self.links, options)?;
        insert_text(&mut map, "status", &self.status);
        insert_text(&mut map, "code", &self.code);
        insert_text(&mut map, "title", &self.title);
        insert_text(&mut map, "detail", &self.detail);
        insert_value(&mut map, path, "source", &self.source, options)?;
        insert_value(&mut map, path, "meta", &self.meta, options)?;
        Ok(map)
    }

    fn encode_list(
        errors: &[Self],
        path: &str,
        options: &EncodeOptions,
        max: usize,
    ) -> Result<Value, EncodeError> {
        check_encode_len("errors", errors.len(), max)?;
        let items = errors
            .iter()
            .enumerate()
            .map(|(i, error)| error.encode_object(&item_path(path, i), options).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }
}

impl<I, L, S, C, T, D, Src, M> ErrorObject<I, L, S, C, T, D, Src, M>
where
    I: TextMember,
    L: DecodeMember,
    S: TextMember,
    C: TextMember,
    T: TextMember,
    D: TextMember,
    Src: DecodeMember,
    M: DecodeMember,
{
    fn decode_object(mut raw: Map<String, Value>, path: &str) -> Result<Self, DecodeError> {
        Ok(ErrorObject {
            id: I::decode_text(raw.remove("id"), path, "id")?,
            links: L::decode_member(raw.remove("links"), path, "links")?,
            status: S::decode_text(raw.remove("status"), path, "status")?,
            code: C::decode_text(raw.remove("code"), path, "code")?,
            title: T::decode_text(raw.remove("title"), path, "title")?,
            detail: D::decode_text(raw.remove("detail"), path, "detail")?,
            source: Src::decode_member(raw.remove("source"), path, "source")?,
            meta: M::decode_member(raw.remove("meta"), path, "meta")?,
        })
    }

    fn decode_list(items: Vec<Value>, path: &str, max: usize) -> Result<Vec<Self>, DecodeError> {
        check_decode_len("errors", items.len(), max)?;
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let path = item_path(path, i);
                Self::decode_object(expect_object(item, &path)?, &path)
            })
            .collect()
    }
}

impl<I, L, S, C, T, D, Src, M> Member for Vec<ErrorObject<I, L, S, C, T, D, Src, M>> {
    const PRESENT: bool = true;
}

impl<I, L, S, C, T, D, Src, M> EncodeMember for Vec<ErrorObject<I, L, S, C, T, D, Src, M>>
where
    I: TextMember,
    L: EncodeMember,
    S: TextMember,
    C: TextMember,
    T: TextMember,
    D: TextMember,
    Src: EncodeMember,
    M: EncodeMember,
{
    fn encode_member(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        ErrorObject::encode_list(self.as_slice(), path, options, MAX_ERRORS).map(Some)
    }
}

impl<I, L, S, C, T, D, Src, M> DecodeMember for Vec<ErrorObject<I, L, S, C, T, D, Src, M>>
where
    I: TextMember,
    L: DecodeMember,
    S: TextMember,
    C: TextMember,
    T: TextMember,
    D: TextMember,
    Src: DecodeMember,
    M: DecodeMember,
{
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let path = member_path(parent, member);
        let items = expect_array(require(value, parent, member)?, &path)?;
        ErrorObject::decode_list(items, &path, MAX_ERRORS)
    }
}

/// Writes a one-line summary of an error list: each error as its present
/// status, code, title and detail joined by spaces, errors joined by "; ".
pub(crate) fn describe_errors<I, L, S, C, T, D, Src, M>(
    errors: &[ErrorObject<I, L, S, C, T, D, Src, M>],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result
where
    S: TextMember,
    C: TextMember,
    T: TextMember,
    D: TextMember,
{
    if errors.is_empty() {
        return f.write_str("error document without errors");
    }
    for (i, error) in errors.iter().enumerate() {
        if i > 0 {
            f.write_str("; ")?;
        }
        let parts: Vec<String> = [
            error.status.encode_text(),
            error.code.encode_text(),
            error.title.encode_text(),
            error.detail.encode_text(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            f.write_str("unspecified error")?;
        } else {
            f.write_str(&parts.join(" "))?;
        }
    }
    Ok(())
}

fn insert_text<F: TextMember>(map: &mut Map<String, Value>, member: &'static str, field: &F) {
    if let Some(text) = field.encode_text() {
        map.insert(member.to_string(), Value::String(text));
    }
}

fn insert_value<F: EncodeMember>(
    map: &mut Map<String, Value>,
    path: &str,
    member: &'static str,
    field: &F,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    if let Some(value) = field.encode_member(&member_path(path, member), options)? {
        map.insert(member.to_string(), value);
    }
    Ok(())
}
