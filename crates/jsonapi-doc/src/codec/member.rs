//! Member-level encoding/decoding shared by every document slot.
//!
//! Each slot of a resource object, error object or document is typed by a
//! schema marker. The traits here resolve, per instantiation, whether the
//! slot exists on the wire and how its value crosses the serde boundary.

use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::codec::document::EncodeOptions;
use crate::error::{DecodeError, EncodeError};
use crate::model::{Absent, Present};

/// Path of the document root; member paths below it are bare keys.
pub const ROOT: &str = "";

/// Static presence of a slot for a given instantiation.
pub trait Member {
    /// Whether the slot is written and read at all.
    const PRESENT: bool;
}

/// A slot that can be written.
pub trait EncodeMember: Member {
    /// Returns the wire value, or `None` when the slot is statically absent.
    fn encode_member(
        &self,
        path: &str,
        options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError>;
}

/// A slot that can be read.
pub trait DecodeMember: Member + Sized {
    /// Decodes the slot from the raw member value (`None` if the key is missing).
    ///
    /// `parent` is the path of the enclosing object, `member` the key.
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError>;
}

/// A slot transmitted as a wire string and converted losslessly on the host.
pub trait TextMember: Member + Sized {
    /// Returns the wire string, or `None` when statically absent.
    fn encode_text(&self) -> Option<String>;

    /// Decodes the slot from the raw member value.
    fn decode_text(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError>;
}

// =============================================================================
// ABSENT
// =============================================================================

impl Member for Absent {
    const PRESENT: bool = false;
}

impl EncodeMember for Absent {
    fn encode_member(
        &self,
        _path: &str,
        _options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        Ok(None)
    }
}

impl DecodeMember for Absent {
    fn decode_member(_: Option<Value>, _: &str, _: &'static str) -> Result<Self, DecodeError> {
        Ok(Absent)
    }
}

impl TextMember for Absent {
    fn encode_text(&self) -> Option<String> {
        None
    }

    fn decode_text(_: Option<Value>, _: &str, _: &'static str) -> Result<Self, DecodeError> {
        Ok(Absent)
    }
}

// =============================================================================
// PRESENT
// =============================================================================

impl<T> Member for Present<T> {
    const PRESENT: bool = true;
}

impl<T: Serialize> EncodeMember for Present<T> {
    fn encode_member(
        &self,
        path: &str,
        _options: &EncodeOptions,
    ) -> Result<Option<Value>, EncodeError> {
        serde_json::to_value(&self.0)
            .map(Some)
            .map_err(|e| EncodeError::Serialize {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

impl<T: DeserializeOwned> DecodeMember for Present<T> {
    fn decode_member(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let value = require(value, parent, member)?;
        serde_json::from_value(value)
            .map(Present)
            .map_err(|e| DecodeError::InvalidMember {
                path: member_path(parent, member),
                message: e.to_string(),
            })
    }
}

impl<T: FromStr + Display> TextMember for Present<T> {
    fn encode_text(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn decode_text(
        value: Option<Value>,
        parent: &str,
        member: &'static str,
    ) -> Result<Self, DecodeError> {
        let path = member_path(parent, member);
        let text = expect_string(require(value, parent, member)?, &path)?;
        match text.parse() {
            Ok(value) => Ok(Present(value)),
            Err(_) => Err(DecodeError::MalformedIdentifier {
                path,
                field: member,
                value: text,
            }),
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Joins a parent path and a member key.
pub(crate) fn member_path(parent: &str, member: &str) -> String {
    if parent.is_empty() {
        member.to_string()
    } else {
        format!("{parent}.{member}")
    }
}

/// Joins a parent path and an array index.
pub(crate) fn item_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Returns the JSON kind name of a value, for shape errors.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn require(
    value: Option<Value>,
    parent: &str,
    member: &'static str,
) -> Result<Value, DecodeError> {
    value.ok_or_else(|| DecodeError::MissingMember {
        path: if parent.is_empty() { "document".to_string() } else { parent.to_string() },
        member,
    })
}

pub(crate) fn expect_object(value: Value, path: &str) -> Result<Map<String, Value>, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::UnexpectedShape {
            path: path.to_string(),
            expected: "object",
            found: value_kind(&other),
        }),
    }
}

pub(crate) fn expect_array(value: Value, path: &str) -> Result<Vec<Value>, DecodeError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(DecodeError::UnexpectedShape {
            path: path.to_string(),
            expected: "array",
            found: value_kind(&other),
        }),
    }
}

pub(crate) fn expect_string(value: Value, path: &str) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DecodeError::UnexpectedShape {
            path: path.to_string(),
            expected: "string",
            found: value_kind(&other),
        }),
    }
}

/// Removes a required string member from a keyed object.
pub(crate) fn take_string(
    raw: &mut Map<String, Value>,
    parent: &str,
    member: &'static str,
) -> Result<String, DecodeError> {
    let value = require(raw.remove(member), parent, member)?;
    expect_string(value, &member_path(parent, member))
}
